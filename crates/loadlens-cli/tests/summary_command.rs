use assert_cmd::Command;
use loadlens_core::analysis::{Rating, RunKind};
use predicates::prelude::*;
use std::path::PathBuf;

/// Helper to get path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(filename)
}

#[allow(deprecated)]
fn get_loadlens_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("loadlens")
}

/// Summary of a protocol run reads totals and metadata from the aggregate
#[test]
fn test_summarize_protocol_run() {
    let result = loadlens_cli::commands::summary::summarize(&fixture_path("protocol-run.json"));
    assert!(result.is_ok(), "Should successfully summarize results file");

    let overview = result.unwrap();
    assert_eq!(overview.run_kind, RunKind::Protocol);
    assert_eq!(overview.test_id.as_deref(), Some("proto-run-1"));
    assert_eq!(overview.intervals, 3);
    assert_eq!(overview.total_requests, 300);
    assert_eq!(overview.total_errors, 3);
    assert_eq!(overview.vusers_created, 30);
    assert_eq!(overview.duration_seconds, 30.0);
    assert_eq!(overview.average_request_rate, 10.0);
    assert_eq!(overview.response_time.p95, 120.0);
    assert_eq!(overview.tags, vec!["env:staging", "team:payments"]);
    assert_eq!(overview.tool_version.as_deref(), Some("2.0.21"));
    assert_eq!(overview.score.apdex, Rating::Satisfied);
    assert!(overview.score.pass);
}

/// Browser runs count browser requests and derive the rate from duration
#[test]
fn test_summarize_browser_run() {
    let overview =
        loadlens_cli::commands::summary::summarize(&fixture_path("browser-run.json")).unwrap();

    assert_eq!(overview.run_kind, RunKind::Browser);
    assert_eq!(overview.total_requests, 400);
    assert_eq!(overview.duration_seconds, 20.0);
    assert_eq!(overview.average_request_rate, 20.0);
    // Count-weighted TTFB mean: (20*90 + 10*110 + 10*130) / 40
    assert_eq!(overview.response_time.mean, 105.0);
    assert_eq!(overview.response_time.p95, 172.5);
    assert_eq!(overview.response_time.p99, 250.0);
    assert_eq!(overview.tool_version.as_deref(), Some("2.0.21"));
}

#[test]
fn test_summarize_malformed_file_fails() {
    let result = loadlens_cli::commands::summary::summarize(&fixture_path("malformed.json"));
    assert!(result.is_err());
}

#[test]
fn test_summarize_missing_intermediate_fails() {
    let result =
        loadlens_cli::commands::summary::summarize(&fixture_path("missing-intermediate.json"));
    assert!(result.is_err());
}

#[test]
fn test_summary_json_output() {
    let mut cmd = Command::new(get_loadlens_bin());
    cmd.arg("summary")
        .arg(fixture_path("protocol-run.json"))
        .arg("--format")
        .arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(json["run_kind"], "protocol");
    assert_eq!(json["total_requests"], 300);
    assert_eq!(json["score"]["apdex"], "satisfied");
    assert_eq!(json["score"]["pass"], true);
}

#[test]
fn test_summary_table_output() {
    let mut cmd = Command::new(get_loadlens_bin());
    cmd.arg("summary")
        .arg(fixture_path("browser-run.json"))
        .arg("--format")
        .arg("table");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Metric,Value"))
        .stdout(predicate::str::contains("Run Type,browser"))
        .stdout(predicate::str::contains("Mean (ms),105.00"))
        .stdout(predicate::str::contains("Apdex,tolerated"))
        .stdout(predicate::str::contains("Verdict,FAIL"));
}

#[test]
fn test_summary_format_from_env() {
    let mut cmd = Command::new(get_loadlens_bin());
    cmd.env("LOADLENS_FORMAT", "table")
        .arg("summary")
        .arg(fixture_path("protocol-run.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Total Requests,300"));
}

#[test]
fn test_summary_malformed_file_reports_error() {
    let mut cmd = Command::new(get_loadlens_bin());
    cmd.arg("summary").arg(fixture_path("malformed.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse results file"));
}

#[test]
fn test_summary_rejects_non_json_file() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("results.txt");
    std::fs::write(&path, "{}").unwrap();

    let mut cmd = Command::new(get_loadlens_bin());
    cmd.arg("summary").arg(&path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file"));
}
