//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn rigcheck_cli() -> Command {
    cargo_bin_cmd!("rigcheck-cli")
}

/// Path to rigcheck library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("rigcheck")
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_cli_help() {
    let mut cmd = rigcheck_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("compatibility"));
}

#[test]
fn test_cli_version() {
    let mut cmd = rigcheck_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_check_complete_build() {
    let mut cmd = rigcheck_cli();
    let path = fixtures_dir().join("complete_build.json");

    cmd.arg("check").arg(path).arg("--fail-on").arg("low");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("100/100"))
        .stdout(predicate::str::contains("Recommended PSU: 600W"));
}

#[test]
fn test_cli_check_socket_mismatch_fails_on_critical() {
    let mut cmd = rigcheck_cli();
    let path = fixtures_dir().join("socket_mismatch.json");

    cmd.arg("check").arg(path).arg("--fail-on").arg("critical");

    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("CRITICAL"))
        .stdout(predicate::str::contains("LGA1700"));
}

#[test]
fn test_cli_check_without_fail_on_succeeds() {
    let mut cmd = rigcheck_cli();
    let path = fixtures_dir().join("socket_mismatch.json");

    cmd.arg("check").arg(path);

    cmd.assert().success();
}

#[test]
fn test_cli_check_json_output() {
    let mut cmd = rigcheck_cli();
    let path = fixtures_dir().join("oversized_gpu.json");

    let output = cmd
        .arg("check")
        .arg(path)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["total_builds"], 1);
    let issues = json["results"][0]["compatibility"]["issues"].as_array().unwrap();
    assert!(issues.iter().any(|i| i["kind"] == "size_conflict"));
}

#[test]
fn test_cli_github_format() {
    let mut cmd = rigcheck_cli();
    let path = fixtures_dir().join("tight_psu.json");

    cmd.arg("check").arg(path).arg("--format").arg("github");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("::warning file="))
        .stdout(predicate::str::contains("headroom"));
}

#[test]
fn test_cli_check_nonexistent_file() {
    let mut cmd = rigcheck_cli();

    cmd.arg("check").arg("does_not_exist.json");

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_check_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut cmd = rigcheck_cli();
    cmd.arg("check").arg(&path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"));
}

#[test]
fn test_cli_batch_command() {
    let mut cmd = rigcheck_cli();

    cmd.arg("batch").arg(fixtures_dir()).arg("--format").arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"total_builds\": 6"));
}

#[test]
fn test_cli_batch_fail_on_critical() {
    let mut cmd = rigcheck_cli();

    cmd.arg("batch").arg(fixtures_dir()).arg("--fail-on").arg("critical");

    cmd.assert().code(1);
}

#[test]
fn test_cli_config_and_rate_flags() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("options.json");
    std::fs::write(&config, r#"{"usage_hours_per_day": 12, "electricity_rate": 0.5}"#).unwrap();
    let path = fixtures_dir().join("complete_build.json");

    let cheap = rigcheck_cli()
        .arg("check")
        .arg(&path)
        .arg("--format")
        .arg("json")
        .arg("--rate")
        .arg("0")
        .output()
        .unwrap();
    let cheap: serde_json::Value = serde_json::from_slice(&cheap.stdout).unwrap();
    assert_eq!(cheap["results"][0]["monthly_cost"]["total"], 0.0);

    let configured = rigcheck_cli()
        .arg("check")
        .arg(&path)
        .arg("--format")
        .arg("json")
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    let configured: serde_json::Value = serde_json::from_slice(&configured.stdout).unwrap();
    assert!(configured["results"][0]["monthly_cost"]["total"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_cli_bad_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("options.json");
    std::fs::write(&config, "not json").unwrap();

    let mut cmd = rigcheck_cli();
    cmd.arg("check")
        .arg(fixtures_dir().join("complete_build.json"))
        .arg("--config")
        .arg(&config);

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("failed to load options"));
}

#[test]
fn test_cli_psus_command() {
    let mut cmd = rigcheck_cli();

    cmd.arg("psus").arg("850");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("850W"))
        .stdout(predicate::str::contains("Gold").or(predicate::str::contains("Platinum")));
}

#[test]
fn test_cli_psus_too_large() {
    let mut cmd = rigcheck_cli();

    cmd.arg("psus").arg("5000");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No reference PSU"));
}

#[test]
fn test_cli_rules_command() {
    let mut cmd = rigcheck_cli();

    cmd.arg("rules");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("socket"))
        .stdout(predicate::str::contains("weight 30"));
}

#[test]
fn test_cli_rules_verbose() {
    let mut cmd = rigcheck_cli();

    cmd.arg("rules").arg("--verbose");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Needs:"));
}

#[test]
fn test_cli_output_formats_are_different() {
    let path = fixtures_dir().join("socket_mismatch.json");

    let human_output = rigcheck_cli()
        .arg("check")
        .arg(&path)
        .arg("--format")
        .arg("human")
        .output()
        .unwrap();

    let json_output = rigcheck_cli()
        .arg("check")
        .arg(&path)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    assert_ne!(
        human_output.stdout,
        json_output.stdout,
        "Different formats should produce different output"
    );
}

#[test]
fn test_cli_rules_uses_config_weights() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("options.json");
    std::fs::write(&config, r#"{"scoring": {"socket_weight": 40}}"#).unwrap();

    let mut cmd = rigcheck_cli();
    cmd.arg("rules").arg("--config").arg(&config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("weight 40"))
        .stdout(predicate::str::contains("weight 25"));
}

#[test]
fn test_cli_human_prints_price_as_given() {
    let mut cmd = rigcheck_cli();
    let path = fixtures_dir().join("complete_build.json");

    cmd.arg("check").arg(path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Total price: 167500"));
}
