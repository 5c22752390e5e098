//! End-to-end tests for gbak commands that never reach Google Drive.
//!
//! Each test runs the built binary with its config and data directories
//! pointed at a temporary directory.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn gbak(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gbak"))
        .args(args)
        .env("GBAK_CONFIG", home.join("config.toml"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("GBAK_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run gbak")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_config_path_honors_env() {
    let home = TempDir::new().unwrap();
    let output = gbak(home.path(), &["config", "path"]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        home.path().join("config.toml").display().to_string()
    );
}

#[test]
fn test_config_init_then_show() {
    let home = TempDir::new().unwrap();

    let init = gbak(home.path(), &["config", "init"]);
    assert!(init.status.success());
    assert!(home.path().join("config.toml").exists());

    let again = gbak(home.path(), &["config", "init"]);
    assert_eq!(again.status.code(), Some(5));

    let show = gbak(home.path(), &["--json", "config", "show"]);
    assert!(show.status.success());
    let value: Value = serde_json::from_slice(&show.stdout).unwrap();
    assert_eq!(value["exists"], true);
    assert_eq!(value["config"]["version"], 1);
}

#[test]
fn test_list_dry_run_prints_query() {
    let home = TempDir::new().unwrap();
    let output = gbak(
        home.path(),
        &[
            "list",
            "--dry-run",
            "-f",
            "title_contains=quarterly report",
            "-f",
            "modifiedDate_gte=2012-06-04",
        ],
    );

    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        "title contains 'quarterly report' and modifiedDate >= '2012-06-04T00:00:00+00:00'"
    );
}

#[test]
fn test_list_dry_run_json() {
    let home = TempDir::new().unwrap();
    let output = gbak(
        home.path(),
        &["--json", "list", "--dry-run", "--folders", "-f", "title=Photos"],
    );

    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value["query"],
        "title = 'Photos' and mimeType = 'application/vnd.google-apps.folder'"
    );
}

#[test]
fn test_list_strict_unknown_field_exits_with_filter_error() {
    let home = TempDir::new().unwrap();
    let output = gbak(
        home.path(),
        &["--json", "list", "--dry-run", "--strict", "-f", "titel=x"],
    );

    assert_eq!(output.status.code(), Some(1));
    let value: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(value["error"]["code"], "FILTER_ERROR");
    assert!(value["error"]["message"]
        .as_str()
        .unwrap()
        .contains("did you mean 'title'?"));
}

#[test]
fn test_list_quote_in_value_is_rejected() {
    let home = TempDir::new().unwrap();
    let output = gbak(home.path(), &["list", "--dry-run", "-f", "title=it's"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error: filter error:"));
}

#[test]
fn test_folders_without_auth_is_config_error() {
    let home = TempDir::new().unwrap();
    let output = gbak(home.path(), &["folders"]);

    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stderr).contains("gbak auth"));
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    let output = gbak(home.path(), &["completions", "bash"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("gbak"));
}
