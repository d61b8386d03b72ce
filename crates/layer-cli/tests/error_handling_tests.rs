//! Exit codes and suggestions for failing invocations.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn layer(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("layer").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn invalid_project_name_is_a_user_error() {
    let tmp = TempDir::new().unwrap();
    layer(tmp.path())
        .args(["new", ".hidden", "--no-service", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid project name"))
        .stderr(predicate::str::contains("Suggestions:"));
}

#[test]
fn existing_project_is_refused() {
    let tmp = TempDir::new().unwrap();
    layer(tmp.path())
        .args(["new", "shop", "--no-service", "--yes"])
        .assert()
        .success();

    layer(tmp.path())
        .args(["new", "shop", "--no-service", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("layer add"));
}

#[test]
fn unknown_template_is_not_found() {
    let tmp = TempDir::new().unwrap();
    layer(tmp.path())
        .args(["new", "shop", "--template", "payments", "--yes"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("payments"));
}

#[test]
fn add_outside_a_project_is_not_found() {
    let tmp = TempDir::new().unwrap();
    layer(tmp.path())
        .args(["add", "--template", "auth", "--yes"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No layer project found"));
}

#[test]
fn add_without_a_selection_fails_when_not_interactive() {
    let tmp = TempDir::new().unwrap();
    layer(tmp.path())
        .args(["new", "shop", "--no-service", "--yes"])
        .assert()
        .success();

    layer(&tmp.path().join("shop"))
        .args(["add", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--template"));
}

#[test]
fn add_refuses_a_port_already_published() {
    let tmp = TempDir::new().unwrap();
    layer(tmp.path())
        .args(["new", "shop", "--template", "auth", "--yes"])
        .assert()
        .success();

    layer(&tmp.path().join("shop"))
        .args(["add", "--variant", "broker", "--name", "mailer", "--port", "8080", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("both publish port 8080"));

    assert!(!tmp.path().join("shop/mailer").exists());
}

#[test]
fn malformed_route_is_rejected_by_the_parser() {
    let tmp = TempDir::new().unwrap();
    layer(tmp.path())
        .args(["new", "shop", "--variant", "api", "--route", "FETCH:/x:X"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("FETCH"));
}

#[test]
fn unknown_config_key_is_a_configuration_error() {
    let tmp = TempDir::new().unwrap();
    layer(tmp.path())
        .args(["config", "get", "defaults.lang"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn missing_explicit_config_file_is_a_configuration_error() {
    let tmp = TempDir::new().unwrap();
    layer(tmp.path())
        .args(["--config", "missing.toml", "list"])
        .assert()
        .code(4);
}

#[test]
fn verbose_errors_drop_the_hint() {
    let tmp = TempDir::new().unwrap();
    layer(tmp.path())
        .args(["-v", "add", "--template", "auth"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Use -v / --verbose").not());
}

#[test]
fn no_arguments_prints_help() {
    let tmp = TempDir::new().unwrap();
    layer(tmp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}
