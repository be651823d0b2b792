//! Error scenario integration tests

use std::path::Path;
use std::process::Command;

fn sayble_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sayble"))
}

/// Binary with config and runtime dirs pointed at `dir`
fn isolated(dir: &Path) -> Command {
    let mut cmd = sayble_bin();
    cmd.env("XDG_CONFIG_HOME", dir)
        .env("XDG_RUNTIME_DIR", dir)
        .env_remove("SAYBLE_APP_ID")
        .env_remove("SAYBLE_ACCESS_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn missing_credentials_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = isolated(dir.path())
        .args(["--no-display"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("credentials"),
        "Expected error about missing credentials, got: {}",
        stderr
    );
}

#[test]
fn config_get_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let output = isolated(dir.path())
        .args(["config", "get", "unknown_key"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown") || stderr.contains("Valid"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let output = isolated(dir.path())
        .args(["config", "set", "unknown_key", "value"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown") || stderr.contains("Valid"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_duration() {
    let dir = tempfile::tempdir().unwrap();
    let output = isolated(dir.path())
        .args(["config", "set", "max_duration", "invalid"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid duration"),
        "Expected error about invalid duration, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_output_mode() {
    let dir = tempfile::tempdir().unwrap();
    let output = isolated(dir.path())
        .args(["config", "set", "output_mode", "telepathy"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid output mode"),
        "Expected error about invalid output mode, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_boolean() {
    let dir = tempfile::tempdir().unwrap();
    let output = isolated(dir.path())
        .args(["config", "set", "notify", "maybe"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("true") || stderr.contains("false"),
        "Expected error about invalid boolean, got: {}",
        stderr
    );
}

#[test]
fn config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let set = isolated(dir.path())
        .args(["config", "set", "language", "en"])
        .output()
        .expect("Failed to execute command");
    assert!(set.status.success());

    let get = isolated(dir.path())
        .args(["config", "get", "language"])
        .output()
        .expect("Failed to execute command");
    assert!(get.status.success());
    assert_eq!(String::from_utf8_lossy(&get.stdout).trim(), "en");
}

#[test]
fn config_list_with_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = isolated(dir.path())
        .args(["config", "list"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("not set") && stdout.contains("access_key"),
        "Expected config list output, got: {}",
        stdout
    );
}

#[cfg(unix)]
#[test]
fn daemon_command_without_daemon() {
    let dir = tempfile::tempdir().unwrap();
    let output = isolated(dir.path())
        .args(["daemon", "status"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No daemon running"),
        "Expected not-running error, got: {}",
        stderr
    );
}
