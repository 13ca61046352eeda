//! Integration tests for extraction and aggregation over fixture files

use proptest::prelude::*;
use pytypecov::coverage::{Coverage, CoverageAggregator, CoverageSummary};
use pytypecov::discovery::SourceUnit;
use pytypecov::parser::{Parser, PythonParser};
use std::path::PathBuf;

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(name: &str) -> SourceUnit {
    let path = fixtures_path().join("python").join(name);
    if !path.exists() {
        panic!("Fixture not found: {:?}", path);
    }
    SourceUnit::new(path)
}

fn aggregate(names: &[&str]) -> CoverageSummary {
    let units: Vec<SourceUnit> = names.iter().map(|n| fixture(n)).collect();
    CoverageAggregator::new().aggregate(&units)
}

fn percent(coverage: Coverage) -> f64 {
    coverage.percent().expect("coverage should be applicable")
}

// ============================================================================
// Fixture files
// ============================================================================

mod fixture_tests {
    use super::*;

    #[test]
    fn test_annotated_function() {
        let summary = aggregate(&["annotated_function.py"]);
        assert_eq!(summary.parameter_coverage(), Coverage::Percent(100.0));
        assert_eq!(summary.return_coverage(), Coverage::Percent(100.0));
        assert_eq!(summary.skipped_units, 0);
        // The bare `*` separator is not a parameter
        assert_eq!(summary.total_parameters, 4);
    }

    #[test]
    fn test_non_annotated_function() {
        let summary = aggregate(&["non_annotated_function.py"]);
        assert_eq!(summary.parameter_coverage(), Coverage::Percent(0.0));
        assert_eq!(summary.return_coverage(), Coverage::Percent(0.0));
        assert_eq!(summary.skipped_units, 0);
    }

    #[test]
    fn test_mixed_files() {
        let summary = aggregate(&["annotated_function.py", "non_annotated_function.py"]);
        assert!((percent(summary.parameter_coverage()) - 66.666).abs() < 0.01);
        assert!((percent(summary.return_coverage()) - 66.666).abs() < 0.01);
        assert_eq!(summary.total_functions, 3);
    }

    #[test]
    fn test_syntax_error_file_is_skipped() {
        let summary = aggregate(&["syntax_error.py"]);
        assert_eq!(summary.parameter_coverage(), Coverage::NotApplicable);
        assert_eq!(summary.return_coverage(), Coverage::NotApplicable);
        assert_eq!(summary.skipped_units, 1);
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let err = PythonParser::new()
            .parse(&fixture("syntax_error.py"))
            .unwrap_err();
        assert!(err.to_string().contains("syntax error"));
    }

    #[test]
    fn test_python2_module_is_skipped() {
        let summary = aggregate(&["python2_module.py"]);
        assert_eq!(summary.skipped_units, 1);
        assert_eq!(summary.total_functions, 0);
        assert_eq!(summary.parameter_coverage(), Coverage::NotApplicable);
        assert_eq!(summary.return_coverage(), Coverage::NotApplicable);
    }

    #[test]
    fn test_python2_module_adds_nothing_to_valid_files() {
        let summary = aggregate(&["python2_module.py", "annotated_function.py"]);
        assert_eq!(summary.skipped_units, 1);
        assert_eq!(summary.total_parameters, 4);
        assert_eq!(summary.parameter_coverage(), Coverage::Percent(100.0));
    }

    #[test]
    fn test_class_with_init() {
        let summary = aggregate(&["class_with_init.py"]);
        assert_eq!(summary.parameter_coverage(), Coverage::Percent(100.0));
        assert_eq!(summary.return_coverage(), Coverage::Percent(100.0));
        assert_eq!(summary.total_functions, 2);
        assert_eq!(summary.return_eligible_functions, 1);
    }

    #[test]
    fn test_class_methods() {
        let summary = aggregate(&["class_methods.py"]);
        // `self` and `cls` are never counted
        assert_eq!(summary.total_parameters, 4);
        assert_eq!(summary.parameter_coverage(), Coverage::Percent(75.0));
        assert!((percent(summary.return_coverage()) - 33.333).abs() < 0.01);
    }

    #[test]
    fn test_complex_types() {
        let summary = aggregate(&["complex_types.py"]);
        assert_eq!(summary.parameter_coverage(), Coverage::Percent(100.0));
        assert_eq!(summary.return_coverage(), Coverage::Percent(100.0));
    }

    #[test]
    fn test_attribute_probes() {
        let summary = aggregate(&["probes.py"]);
        assert_eq!(summary.hasattr_calls, 1);
        assert_eq!(summary.getattr_default_calls, 1);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let summary = CoverageAggregator::new().aggregate(&[
            SourceUnit::new(fixtures_path().join("python/does_not_exist.py")),
            fixture("complex_types.py"),
        ]);
        assert_eq!(summary.skipped_units, 1);
        assert_eq!(summary.parameter_coverage(), Coverage::Percent(100.0));
    }
}

// ============================================================================
// Stub precedence
// ============================================================================

mod stub_precedence_tests {
    use super::*;

    fn units() -> Vec<SourceUnit> {
        vec![
            SourceUnit::from_source("pkg/io.py", "def read(path, mode='r'):\n    pass\n"),
            SourceUnit::from_source("pkg/io.pyi", "def read(path: str, mode: str = ...) -> bytes: ...\n"),
            SourceUnit::from_source(
                "pkg/io_extra.py",
                "class Reader:\n    def close(self):\n        pass\n",
            ),
            SourceUnit::from_source(
                "stubs/io_extra.pyi",
                "class Reader:\n    def close(self) -> None: ...\n",
            ),
            SourceUnit::from_source("other/io.py", "def read(path: str) -> bytes:\n    pass\n"),
            SourceUnit::from_source("pkg/util.py", "def helper(x):\n    return x\n"),
        ]
    }

    #[test]
    fn test_stub_records_win() {
        let summary = CoverageAggregator::new().aggregate(&units());
        assert_eq!(summary.total_functions, 3);
        // io.read from the stub (2/2), util.helper (0/1)
        assert_eq!(summary.total_parameters, 3);
        assert_eq!(summary.annotated_parameters, 2);
        // read and close annotated, helper not
        assert_eq!(summary.annotated_returns, 2);
    }

    proptest! {
        #[test]
        fn prop_aggregation_is_order_independent(shuffled in Just(units()).prop_shuffle()) {
            let expected = CoverageAggregator::new().aggregate(&units());
            prop_assert_eq!(CoverageAggregator::new().aggregate(&shuffled), expected);
        }
    }
}
