//! CLI argument and config-loading failure tests (no network involved).

use assert_cmd::Command;
use predicates::prelude::predicate;
use std::fs;
use tempfile::TempDir;

#[test]
fn run_without_subcommand_prints_usage() {
    Command::cargo_bin("sheetsync")
        .expect("binary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn run_with_missing_config_fails_with_path() {
    Command::cargo_bin("sheetsync")
        .expect("binary")
        .args(["run", "--config", "/nonexistent/config.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read config"));
}

#[test]
fn run_with_corrupt_config_reports_parse_error() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("config.json");
    fs::write(&config, "{not json").expect("write");

    Command::cargo_bin("sheetsync")
        .expect("binary")
        .args(["run", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn run_with_incomplete_config_names_the_field() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("config.json");
    fs::write(
        &config,
        r#"{"user_id": "u@x.com", "workbook_path": "wb.xlsx", "access_token": ""}"#,
    )
    .expect("write");

    Command::cargo_bin("sheetsync")
        .expect("binary")
        .args(["check", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("access_token"));
}
