//! CLI integration tests for sky-search

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("sky-search").unwrap();
    cmd.env_remove("SKYLINE_IDENTIFIER")
        .env_remove("SKYLINE_APP_PASSWORD")
        .env("SKYLINE_CONFIG", "/nonexistent/skyline/config.toml");
    cmd
}

#[test]
fn test_help_flag_output() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Search Bluesky posts"));
}

#[test]
fn test_query_is_required() {
    cmd().assert().failure();
}

#[test]
fn test_blank_query_is_invalid_input() {
    cmd()
        .arg("   ")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("search term cannot be empty"));
}
