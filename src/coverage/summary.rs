use super::Coverage;
use serde::Serialize;

/// Aggregate counts for one set of source units
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageSummary {
    pub total_parameters: usize,
    pub annotated_parameters: usize,
    pub total_functions: usize,
    /// Functions eligible for return statistics (initializers excluded)
    pub return_eligible_functions: usize,
    pub annotated_returns: usize,
    /// Units that could not be read or parsed
    pub skipped_units: usize,
    /// Public declarations after deduplication
    pub surface_area: usize,
    pub hasattr_calls: usize,
    pub getattr_default_calls: usize,
}

impl CoverageSummary {
    pub fn parameter_coverage(&self) -> Coverage {
        Coverage::from_counts(self.annotated_parameters, self.total_parameters)
    }

    pub fn return_coverage(&self) -> Coverage {
        Coverage::from_counts(self.annotated_returns, self.return_eligible_functions)
    }
}

/// Coverage of a package computed with and without its test code
///
/// `with_tests` is aggregated over every unit, not summed from the two
/// partitions, so a name present in both test and non-test code counts
/// once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartitionedCoverage {
    pub without_tests: CoverageSummary,
    pub with_tests: CoverageSummary,
}
