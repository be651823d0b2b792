//! CLI integration tests

use std::process::Command;

use predicates::prelude::*;

fn sayble_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sayble"))
}

#[test]
fn help_output() {
    let output = sayble_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("dictation"));
    assert!(stdout.contains("--daemon"));
    assert!(stdout.contains("--output-mode"));
    assert!(stdout.contains("--no-auto-output"));
    assert!(stdout.contains("--recognizer"));
    assert!(stdout.contains("--no-display"));
    assert!(stdout.contains("--notify"));
}

#[test]
fn version_output() {
    let output = sayble_bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sayble"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let dir = tempfile::tempdir().unwrap();
    let output = sayble_bin()
        .args(["config", "path"])
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sayble"));
    assert!(stdout.contains("config.toml"));
}

#[test]
fn config_help() {
    let output = sayble_bin()
        .args(["config", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for sub in ["init", "set", "get", "list", "path"] {
        assert!(stdout.contains(sub), "missing {} in: {}", sub, stdout);
    }
}

#[test]
fn daemon_help() {
    let mut cmd = assert_cmd::Command::cargo_bin("sayble").unwrap();
    cmd.args(["daemon", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("toggle")
                .and(predicate::str::contains("start"))
                .and(predicate::str::contains("cancel"))
                .and(predicate::str::contains("status"))
                .and(predicate::str::contains("copy")),
        );
}

#[test]
fn invalid_output_mode_error() {
    let output = sayble_bin()
        .args(["--output-mode", "telepathy"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid") || stderr.contains("possible values"),
        "Expected error about invalid output mode, got: {}",
        stderr
    );
}

#[test]
fn invalid_max_duration_error() {
    let output = sayble_bin()
        .args(["--max-duration", "forever"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("max-duration"),
        "Expected error about invalid max duration, got: {}",
        stderr
    );
}

// Valid invocations without a subcommand start recording, so they are
// covered by unit tests instead.
