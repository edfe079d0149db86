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

#[test]
fn test_evaluate_protocol_run_passes() {
    let report =
        loadlens_cli::commands::score::evaluate(&fixture_path("protocol-run.json")).unwrap();

    assert_eq!(report.run_kind, RunKind::Protocol);
    assert_eq!(report.score.apdex, Rating::Satisfied);
    assert!(report.score.pass);
    assert_eq!(report.score.policy.apdex_threshold, 150.0);
    assert_eq!(report.score.policy.pass_threshold, 300.0);
}

#[test]
fn test_evaluate_browser_run_fails() {
    let report =
        loadlens_cli::commands::score::evaluate(&fixture_path("browser-run.json")).unwrap();

    assert_eq!(report.run_kind, RunKind::Browser);
    assert_eq!(report.score.p95, 172.5);
    assert_eq!(report.score.apdex, Rating::Tolerated);
    assert!(!report.score.pass);
}

#[test]
fn test_score_exit_code_on_failure() {
    let mut cmd = Command::new(get_loadlens_bin());
    cmd.arg("score")
        .arg(fixture_path("browser-run.json"))
        .arg("--exit-code");

    cmd.assert()
        .code(2)
        .stdout(predicate::str::contains("FAIL"));
}

#[test]
fn test_score_failure_without_exit_code_flag_succeeds() {
    let mut cmd = Command::new(get_loadlens_bin());
    cmd.arg("score").arg(fixture_path("browser-run.json"));

    cmd.assert().success();
}

#[test]
fn test_score_json_output() {
    let mut cmd = Command::new(get_loadlens_bin());
    cmd.arg("score")
        .arg(fixture_path("protocol-run.json"))
        .arg("--format")
        .arg("json")
        .arg("--exit-code");

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(json["run_kind"], "protocol");
    assert_eq!(json["apdex"], "satisfied");
    assert_eq!(json["pass"], true);
    assert_eq!(json["policy"]["pass_threshold"], 300.0);
}

#[test]
fn test_report_json_bundles_every_view() {
    let mut cmd = Command::new(get_loadlens_bin());
    cmd.arg("report")
        .arg(fixture_path("browser-run.json"))
        .arg("--format")
        .arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(json["overview"]["run_kind"], "browser");
    assert_eq!(json["series"].as_array().unwrap().len(), 2);
    assert_eq!(json["breakdowns"]["top_flows"].as_array().unwrap().len(), 5);
}
