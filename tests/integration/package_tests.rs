//! Integration tests for package-level analysis against fixture package trees

use pytypecov::analysis::{load_ranked_packages, BatchRunner, PackageAnalyzer};
use pytypecov::coverage::Coverage;
use pytypecov::dataset::CompletenessDataset;
use pytypecov::discovery::LocalPackageSource;
use pytypecov::stubs::{StubLocator, StubPackageIndex, TypeshedLocator};
use std::fs;
use std::path::PathBuf;

fn packages_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/packages")
}

fn analyzer() -> PackageAnalyzer {
    let root = packages_path();
    PackageAnalyzer::new(LocalPackageSource::new(&root))
        .with_typeshed(TypeshedLocator::new(root.join("typeshed")))
        .with_dataset(CompletenessDataset::from_file(&root.join("stats_as_csv.csv")).unwrap())
}

fn assert_close(coverage: Coverage, expected: f64) {
    let actual = coverage.percent().expect("coverage should be applicable");
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_shapes_package_figures() {
    let report = analyzer().analyze("shapes");
    let data = &report.coverage_data;

    assert_close(data.parameter_coverage, 25.0);
    assert_close(data.return_type_coverage, 33.333);
    assert_close(data.param_coverage_with_tests, 25.0);
    assert_close(data.return_coverage_with_tests, 25.0);
    assert_close(data.parameter_coverage_with_stubs, 100.0);
    assert_close(data.return_type_coverage_with_stubs, 100.0);
    assert_eq!(data.skipped_files, 0);

    assert!(report.has_type_shed);
    assert!(!report.has_stubs_package);
    assert!(!report.has_py_typed_file);
    assert_eq!(report.surface_area, 4);
}

#[test]
fn test_shapes_typeshed_stats_attached() {
    let report = analyzer().analyze("shapes");
    let record = report.typeshed_data.expect("dataset has shapes");
    assert_eq!(record.completeness_level, "complete");
    assert_eq!(record.parameter_coverage, Coverage::Percent(100.0));
}

#[test]
fn test_typeshed_locator_lists_only_stubs() {
    let locator = TypeshedLocator::new(packages_path().join("typeshed"));
    let stubs = locator.locate("shapes").unwrap();
    assert_eq!(stubs.len(), 1);
    assert!(stubs[0].kind.is_stub());
}

#[test]
fn test_ranked_batch_over_fixtures() {
    let packages = load_ranked_packages(&packages_path().join("top-packages.json"), 10).unwrap();
    assert_eq!(packages.len(), 2);
    assert_eq!(packages[0].project, "shapes");

    let reports = BatchRunner::new(&analyzer()).with_parallel(true).run(&packages);

    assert_eq!(reports[0].package, "shapes");
    assert_eq!(reports[0].download_ranking, Some(1));
    assert_eq!(reports[0].download_count, Some(5400));
    assert_eq!(reports[1].package, "missing-pkg");
    assert_eq!(
        reports[1].coverage_data.parameter_coverage,
        Coverage::NotApplicable
    );
}

#[test]
fn test_stub_distribution_and_package_stub_priority() {
    let dir = tempfile::tempdir().unwrap();
    let sources = dir.path();

    // The package ships its own stub for api.py; the stub distribution's
    // api.pyi must not be merged
    let pkg = sources.join("client");
    fs::create_dir_all(pkg.join("client")).unwrap();
    fs::write(pkg.join("client/api.py"), "def get(url, timeout):\n    pass\n").unwrap();
    fs::write(
        pkg.join("client/api.pyi"),
        "def get(url: str, timeout) -> bytes: ...\n",
    )
    .unwrap();
    fs::write(pkg.join("client/extra.py"), "def ping(host):\n    pass\n").unwrap();

    let stubs = sources.join("client-stubs");
    fs::create_dir_all(stubs.join("client")).unwrap();
    fs::write(
        stubs.join("client/api.pyi"),
        "def get(url: str, timeout: float) -> bytes: ...\n",
    )
    .unwrap();
    fs::write(
        stubs.join("client/extra.pyi"),
        "def ping(host: str) -> bool: ...\n",
    )
    .unwrap();

    let analyzer = PackageAnalyzer::new(LocalPackageSource::new(sources))
        .with_stub_packages(StubPackageIndex::new(["client"]));
    let report = analyzer.analyze("client");

    assert!(report.has_stubs_package);
    // api.get from the package's own stub (1/2), extra.ping from the
    // distribution (1/1)
    assert_close(report.coverage_data.parameter_coverage, 66.666);
    assert_close(report.coverage_data.return_type_coverage, 100.0);
}

#[test]
fn test_json_report_shape() {
    let report = analyzer().analyze("shapes");
    let value = serde_json::to_value(&report).unwrap();

    for key in [
        "DownloadCount",
        "DownloadRanking",
        "CoverageData",
        "HasPyTypedFile",
        "HasTypeShed",
        "HasStubsPackage",
        "SurfaceArea",
        "HasAttrCalls",
        "GetAttrWithDefaultCalls",
        "TypeshedData",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert!(value["DownloadRanking"].is_null());
    assert_eq!(value["CoverageData"]["skipped_files"], 0);
}
