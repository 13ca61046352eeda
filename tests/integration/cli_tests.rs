//! End-to-end tests for the pytypecov binary

#![allow(deprecated)] // Command::cargo_bin

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn packages_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/packages")
}

/// The binary run from an empty scratch directory with color disabled
fn pytypecov(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pytypecov").unwrap();
    cmd.current_dir(workdir.path())
        .env("NO_COLOR", "1")
        .arg("--quiet");
    cmd
}

fn with_fixtures(cmd: &mut Command) -> &mut Command {
    let root = packages_path();
    cmd.arg("--sources")
        .arg(&root)
        .arg("--typeshed")
        .arg(root.join("typeshed"))
        .arg("--typeshed-stats")
        .arg(root.join("stats_as_csv.csv"))
        .arg("--top-packages")
        .arg(root.join("top-packages.json"))
}

#[test]
fn test_help_flag() {
    let dir = TempDir::new().unwrap();
    pytypecov(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--package-name"))
        .stdout(predicate::str::contains("--write-html"));
}

#[test]
fn test_requires_top_n_or_package() {
    let dir = TempDir::new().unwrap();
    pytypecov(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--package-name"));
}

#[test]
fn test_top_n_out_of_range() {
    let dir = TempDir::new().unwrap();
    pytypecov(&dir).arg("0").assert().failure();
    pytypecov(&dir).arg("8001").assert().failure();
}

#[test]
fn test_single_package_terminal_report() {
    let dir = TempDir::new().unwrap();
    with_fixtures(pytypecov(&dir).args(["--package-name", "shapes"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("Coverage Report for shapes:"))
        .stdout(predicate::str::contains("Parameter Type Coverage: 25.00%"))
        .stdout(predicate::str::contains(
            "Parameter Type Coverage With Stubs: 100.00%",
        ))
        .stdout(predicate::str::contains("Completeness Level: complete"));
}

#[test]
fn test_no_typeshed_stats_hides_block() {
    let dir = TempDir::new().unwrap();
    with_fixtures(pytypecov(&dir).args(["--package-name", "shapes", "--no-typeshed-stats"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("Coverage Report for shapes:"))
        .stdout(predicate::str::contains("Typeshed Coverage Stats").not());
}

#[test]
fn test_top_n_writes_json_and_html() {
    let dir = TempDir::new().unwrap();
    with_fixtures(pytypecov(&dir).args(["2", "--write-json", "--write-html"]))
        .assert()
        .success();

    let json = std::fs::read_to_string(dir.path().join("package_report.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["shapes"]["DownloadRanking"], 1);
    assert_eq!(value["missing-pkg"]["CoverageData"]["parameter_coverage"], "N/A");
    assert!(json.find("\"shapes\"").unwrap() < json.find("\"missing-pkg\"").unwrap());

    let html = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(html.contains("<td>shapes</td>"));
    assert!(html.contains("<td>5400</td>"));
}

#[test]
fn test_parallel_summary() {
    let dir = TempDir::new().unwrap();
    with_fixtures(pytypecov(&dir).args(["2", "--parallel", "--summary"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("Type Coverage Summary"))
        .stdout(predicate::str::contains("Coverage Report for").not());
}

#[test]
fn test_config_file_supplies_paths() {
    let dir = TempDir::new().unwrap();
    let root = packages_path();
    let config = format!(
        "sources_dir = {:?}\ntypeshed_dir = {:?}\njson_report_file = \"out.json\"\n",
        root.display().to_string(),
        root.join("typeshed").display().to_string()
    );
    std::fs::write(dir.path().join("pytypecov.toml"), config).unwrap();

    pytypecov(&dir)
        .args(["--package-name", "shapes", "--write-json"])
        .assert()
        .success();

    assert!(dir.path().join("out.json").is_file());
}

#[test]
fn test_missing_stub_packages_file_fails() {
    let dir = TempDir::new().unwrap();
    with_fixtures(pytypecov(&dir).args(["--package-name", "shapes"]))
        .arg("--stub-packages")
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure();
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    pytypecov(&dir)
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pytypecov"));
}
