//! End-to-end tests for the reqlint CLI
//!
//! These tests verify:
//! - Exit codes for clean, failing and unreadable manifests
//! - CLI produces the expected JSON output schema
//! - Probe, strict and configuration handling
//!
//! None of these tests touch the network: `--resolve` is never passed.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CLEAN_MANIFEST: &str = r#"# Web framework
streamlit>=1.28.0,<2.0.0

# LLM client
openai==0.28.1

# Data processing
pandas>=2.0.0,<3.0.0
"#;

/// Create a test directory with a requirements.txt
fn create_test_project(content: &str) -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    fs::write(temp_dir.path().join("requirements.txt"), content).unwrap();
    temp_dir
}

fn reqlint() -> Command {
    let mut cmd = Command::cargo_bin("reqlint").expect("binary should be built");
    cmd.env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_version_flag() {
    reqlint()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_clean_manifest_passes() {
    let project = create_test_project(CLEAN_MANIFEST);

    reqlint()
        .arg(project.path().join("requirements.txt"))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("3 entries, 0 errors, 0 warnings"))
        .stdout(predicate::str::contains("PASSED"));
}

#[test]
fn test_directory_target() {
    let project = create_test_project(CLEAN_MANIFEST);
    fs::write(
        project.path().join("requirements-dev.txt"),
        "-r requirements.txt\npytest>=8.0,<9\n",
    )
    .unwrap();

    reqlint()
        .arg(project.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("2 files checked"));
}

#[test]
fn test_current_directory_default() {
    let project = create_test_project(CLEAN_MANIFEST);

    reqlint()
        .current_dir(project.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("requirements.txt"));
}

#[test]
fn test_duplicate_declaration_fails() {
    let project = create_test_project("openai==0.28.1\nstreamlit>=1.28.0,<2.0.0\nopenai>=1.0,<2\n");

    reqlint()
        .arg(project.path().join("requirements.txt"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("duplicate declaration"))
        .stdout(predicate::str::contains("line 3"))
        .stdout(predicate::str::contains("FAILED"));
}

#[test]
fn test_unsatisfiable_range_fails() {
    let project = create_test_project("streamlit>=2.0.0,<1.28.0\n");

    reqlint()
        .arg(project.path().join("requirements.txt"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("cannot be satisfied"));
}

#[test]
fn test_missing_file_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    reqlint()
        .arg(temp_dir.path().join("missing.txt"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Manifest detection error"));
}

#[test]
fn test_warnings_only_fail_in_strict_mode() {
    let project = create_test_project("rich\nclick>=8.0\n");
    let path = project.path().join("requirements.txt");

    reqlint()
        .arg(&path)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("no version constraint"))
        .stdout(predicate::str::contains("no upper bound"));

    reqlint().arg(&path).arg("--strict").assert().code(1);

    reqlint()
        .arg(&path)
        .args(["--strict", "--allow-unpinned"])
        .assert()
        .code(0);
}

#[test]
fn test_strict_from_pyproject() {
    let project = create_test_project("rich\n");
    fs::write(
        project.path().join("pyproject.toml"),
        "[tool.reqlint]\nstrict = true\n",
    )
    .unwrap();

    reqlint()
        .arg(project.path().join("requirements.txt"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("(strict)"));
}

#[test]
fn test_invalid_pyproject_is_an_error() {
    let project = create_test_project(CLEAN_MANIFEST);
    fs::write(
        project.path().join("pyproject.toml"),
        "[tool.reqlint]\nstrictness = true\n",
    )
    .unwrap();

    reqlint()
        .arg(project.path().join("requirements.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_probe_satisfied_and_rejected() {
    let project = create_test_project(CLEAN_MANIFEST);
    let path = project.path().join("requirements.txt");

    reqlint()
        .arg(&path)
        .args(["--probe", "streamlit=1.30.0", "--probe", "openai==0.28.1"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("streamlit 1.30.0 satisfies"));

    reqlint()
        .arg(&path)
        .args(["--probe", "streamlit=2.0.0"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("does not satisfy"));

    reqlint()
        .arg(&path)
        .args(["--probe", "openai=0.28.0"])
        .assert()
        .code(1);
}

#[test]
fn test_probe_unknown_package() {
    let project = create_test_project(CLEAN_MANIFEST);

    reqlint()
        .arg(project.path().join("requirements.txt"))
        .args(["--probe", "numpy=1.26.0"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("'numpy' is not declared"));
}

#[test]
fn test_invalid_probe_argument() {
    reqlint()
        .args(["--probe", "streamlit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--probe"));
}

#[test]
fn test_probe_with_comparator_is_a_usage_error() {
    let project = create_test_project(CLEAN_MANIFEST);

    reqlint()
        .arg(project.path().join("requirements.txt"))
        .args(["--probe", "streamlit>=1.0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected NAME=VERSION"));
}

#[test]
fn test_json_output_schema() {
    let project = create_test_project("openai==0.28.1\nrich\nopenai>=1.0,<2\n");

    let output = reqlint()
        .arg(project.path().join("requirements.txt"))
        .arg("--json")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be valid JSON");
    assert_eq!(json["passed"], false);
    assert_eq!(json["strict"], false);
    assert_eq!(json["summary"]["files"], 1);
    assert_eq!(json["summary"]["entries"], 3);
    assert_eq!(json["summary"]["errors"], 1);
    assert_eq!(json["summary"]["warnings"], 1);

    let issues = json["manifests"][0]["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0]["kind"], "unpinned");
    assert_eq!(issues[0]["package"], "rich");
    assert_eq!(issues[1]["kind"], "duplicate_declaration");
    assert_eq!(issues[1]["first_line"], 1);
}

#[test]
fn test_quiet_output() {
    let project = create_test_project(CLEAN_MANIFEST);

    reqlint()
        .arg(project.path().join("requirements.txt"))
        .arg("-q")
        .assert()
        .code(0)
        .stdout("PASSED: 1 file, 0 errors, 0 warnings\n");
}

#[test]
fn test_quiet_and_verbose_conflict() {
    let project = create_test_project(CLEAN_MANIFEST);

    reqlint()
        .arg(project.path().join("requirements.txt"))
        .args(["--quiet", "--verbose"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--quiet and --verbose"));
}
