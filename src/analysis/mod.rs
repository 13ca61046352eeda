//! Package-level analysis
//!
//! Turns a package name into a [`PackageReport`]: coverage with and without
//! tests, coverage with typeshed stubs merged in, and the side facts shown
//! next to those figures.

mod batch;
mod package;

pub use batch::{load_ranked_packages, BatchRunner, RankedPackage, MAX_TOP_N};
pub use package::PackageAnalyzer;

use crate::coverage::Coverage;
use crate::dataset::CompletenessRecord;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// The coverage figures for one package
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageData {
    pub parameter_coverage: Coverage,
    pub return_type_coverage: Coverage,
    /// Non-test code with typeshed stubs merged in; equal to the plain
    /// figures when typeshed has no stubs for the package
    pub parameter_coverage_with_stubs: Coverage,
    pub return_type_coverage_with_stubs: Coverage,
    pub param_coverage_with_tests: Coverage,
    pub return_coverage_with_tests: Coverage,
    pub skipped_files: usize,
}

/// Everything reported for a single package
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageReport {
    #[serde(skip)]
    pub package: String,
    pub download_count: Option<u64>,
    pub download_ranking: Option<usize>,
    pub coverage_data: CoverageData,
    pub has_py_typed_file: bool,
    pub has_type_shed: bool,
    pub has_stubs_package: bool,
    pub surface_area: usize,
    pub has_attr_calls: usize,
    pub get_attr_with_default_calls: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typeshed_data: Option<CompletenessRecord>,
}

/// Serialize reports as a JSON object keyed by package name, keeping the
/// order of `reports`
pub fn serialize_reports<S: Serializer>(
    reports: &[PackageReport],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(reports.len()))?;
    for report in reports {
        map.serialize_entry(&report.package, report)?;
    }
    map.end()
}
