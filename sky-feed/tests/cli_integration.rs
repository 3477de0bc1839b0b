//! CLI integration tests for sky-feed

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("sky-feed").unwrap();
    cmd.env_remove("SKYLINE_IDENTIFIER")
        .env_remove("SKYLINE_APP_PASSWORD");
    cmd
}

#[test]
fn test_help_flag_output() {
    cmd()
        .env("SKYLINE_CONFIG", "/nonexistent/skyline/config.toml")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("latest posts"))
        .stdout(predicate::str::contains("--limit"));
}

#[test]
fn test_missing_credentials_reports_missing_field() {
    // A readable config without credentials: startup must fail on the
    // missing field, before any network access.
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[stream]\nlimit = 5\n").unwrap();

    cmd()
        .env("SKYLINE_CONFIG", config_path.to_str().unwrap())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Missing required field"))
        .stderr(predicate::str::contains("credentials.identifier"));
}

#[test]
fn test_unreadable_config_override_fails() {
    cmd()
        .env("SKYLINE_CONFIG", "/nonexistent/skyline/config.toml")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read config file"));
}
