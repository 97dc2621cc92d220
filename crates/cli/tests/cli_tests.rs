//! Integration tests for the consolekit binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn consolekit_cmd() -> Command {
    let mut cmd = Command::cargo_bin("consolekit").unwrap();
    // Keep host configuration out of the tests.
    cmd.env("CONSOLEKIT_CONFIG_DIR", env!("CARGO_TARGET_TMPDIR"))
        .env("CONSOLEKIT_TELEMETRY__FILTER", "info");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    consolekit_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("relocate"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("emit"));
}

#[test]
fn test_emit_warning() {
    consolekit_cmd()
        .args(["emit", "--kind", "warning", "disk almost full"])
        .assert()
        .success()
        .stderr("[Warning] disk almost full\n");
}

#[test]
fn test_emit_stop_with_depth() {
    consolekit_cmd()
        .args(["emit", "--kind", "stop", "--depth", "2", "Copying files"])
        .assert()
        .success()
        .stderr("--> Finished copying files\n");
}

#[test]
fn test_emit_without_message_writes_prefix() {
    consolekit_cmd()
        .args(["emit", "--kind", "error"])
        .assert()
        .success()
        .stderr("[Error] \n");
}

#[test]
fn test_emit_information_passes_through() {
    consolekit_cmd()
        .args(["emit", "--kind", "information", "hello"])
        .assert()
        .success()
        .stderr("hello\n");
}

#[test]
fn test_plan_prints_json() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("app.bin"), b"0123456789").unwrap();
    fs::write(temp_dir.path().join("lib.dat"), b"abc").unwrap();

    consolekit_cmd()
        .args(["plan", "--dir"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"app.bin\""))
        .stdout(predicate::str::contains("_shadow"));

    assert!(!temp_dir.path().join("_shadow").exists());
}

#[test]
fn test_relocate_directory() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("app.bin"), b"0123456789").unwrap();
    fs::write(temp_dir.path().join("lib.dat"), b"abc").unwrap();

    for _ in 0..2 {
        consolekit_cmd()
            .args(["relocate", "--dir"])
            .arg(temp_dir.path())
            .assert()
            .success()
            .stderr(predicate::str::contains("-> Shadowing binaries"))
            .stderr(predicate::str::contains("-> Finished shadowing binaries"));
    }

    let shadow = temp_dir.path().join("_shadow");
    assert_eq!(fs::read(shadow.join("app.bin")).unwrap(), b"0123456789");
    assert_eq!(fs::read(shadow.join("lib.dat")).unwrap(), b"abc");
    assert_eq!(fs::read(temp_dir.path().join("app.bin")).unwrap(), b"0123456789");
    assert_eq!(fs::read(temp_dir.path().join("lib.dat")).unwrap(), b"abc");
}

#[test]
fn test_relocate_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();

    consolekit_cmd()
        .args(["relocate", "--dir"])
        .arg(temp_dir.path().join("missing"))
        .assert()
        .failure();
}
