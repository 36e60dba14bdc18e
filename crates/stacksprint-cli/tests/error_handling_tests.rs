//! Exit codes and suggestions for failing invocations.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn stacksprint(temp: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("stacksprint");
    cmd.current_dir(temp.path())
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join(".config"))
        .env_remove("STACKSPRINT_TEMPLATES_DIR")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn incompatible_stack_is_a_user_error() {
    let temp = TempDir::new().unwrap();
    let spec = temp.path().join("spec.json");
    fs::write(
        &spec,
        r#"{ "language": "python", "framework": "django", "db": "mongodb" }"#,
    )
    .unwrap();

    stacksprint(&temp)
        .args(["generate", spec.to_str().unwrap()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Suggestions:"));
    assert!(!temp.path().join("scaffold.sh").exists());
}

#[test]
fn missing_spec_is_not_found() {
    let temp = TempDir::new().unwrap();
    stacksprint(&temp)
        .args(["generate", "nope.json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Specification not found"));
}

#[test]
fn malformed_spec_is_a_user_error() {
    let temp = TempDir::new().unwrap();
    let spec = temp.path().join("spec.json");
    fs::write(&spec, r#"{ "language": "cobol" }"#).unwrap();

    stacksprint(&temp)
        .args(["explain", spec.to_str().unwrap()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid specification"));
}

#[test]
fn escaping_custom_path_is_rejected() {
    let temp = TempDir::new().unwrap();
    let spec = temp.path().join("spec.json");
    fs::write(
        &spec,
        r#"{ "language": "go", "custom": { "add_files": [{ "path": "../evil.sh", "content": "" }] } }"#,
    )
    .unwrap();

    stacksprint(&temp)
        .args(["generate", spec.to_str().unwrap(), "--dry-run"])
        .assert()
        .code(2);
}

#[test]
fn missing_explicit_config_is_a_configuration_error() {
    let temp = TempDir::new().unwrap();
    stacksprint(&temp)
        .args(["--config", "absent.toml", "list"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn unknown_config_key_is_a_configuration_error() {
    let temp = TempDir::new().unwrap();
    stacksprint(&temp)
        .args(["config", "get", "defaults.lang"])
        .assert()
        .code(4);
}

#[test]
fn bad_arguments_exit_with_two() {
    let temp = TempDir::new().unwrap();
    stacksprint(&temp)
        .args(["generate", "s.json", "--dry-run", "--apply", "x"])
        .assert()
        .code(2);
}
