//! Annotation coverage aggregation
//!
//! Folds the declarations of many source units into one deduplicated
//! summary. Stub units (`.pyi`) take precedence over implementation units
//! for every fully-qualified name they declare, whatever order the units
//! arrive in.

mod aggregator;
mod summary;

pub use aggregator::CoverageAggregator;
pub use summary::{CoverageSummary, PartitionedCoverage};

use serde::{Serialize, Serializer};
use std::fmt;

/// A coverage percentage, or the sentinel for "nothing to measure"
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coverage {
    Percent(f64),
    NotApplicable,
}

impl Coverage {
    /// `annotated / total * 100`, or `NotApplicable` when `total` is zero
    pub fn from_counts(annotated: usize, total: usize) -> Self {
        if total == 0 {
            Coverage::NotApplicable
        } else {
            Coverage::Percent(annotated as f64 / total as f64 * 100.0)
        }
    }

    pub fn percent(&self) -> Option<f64> {
        match self {
            Coverage::Percent(p) => Some(*p),
            Coverage::NotApplicable => None,
        }
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coverage::Percent(p) => write!(f, "{:.2}%", p),
            Coverage::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// Numbers serialize as-is; the sentinel as the string `"N/A"`
impl Serialize for Coverage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Coverage::Percent(p) => serializer.serialize_f64(*p),
            Coverage::NotApplicable => serializer.serialize_str("N/A"),
        }
    }
}
