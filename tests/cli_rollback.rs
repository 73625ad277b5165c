//! End-to-end binary tests for the thin rollback CLI surface.

use std::fs;
use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use serial_test::serial;
use tempfile::tempdir;

/// Build a command isolated from any real user config.
fn bin(data_dir: &Path, isolated_cfg: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tidy_move").unwrap();
    cmd.env("TIDY_MOVE_CONFIG", isolated_cfg)
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

#[test]
#[serial]
fn list_on_empty_journal_reports_empty() {
    let data = tempdir().unwrap();
    let cfg = data.path().join("no-config.xml");

    let output = bin(data.path(), &cfg)
        .args(["rollback", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Journal is empty"), "stdout: {stdout}");
}

#[test]
#[serial]
fn move_then_rollback_last_restores_the_file() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let cfg = data.path().join("no-config.xml");

    let src = work.path().join("cli_move.txt");
    let dst = work.path().join("out").join("cli_move.txt");
    fs::write(&src, b"via the binary").unwrap();

    bin(data.path(), &cfg)
        .arg("move")
        .arg(&src)
        .arg(&dst)
        .assert()
        .success();
    assert!(!src.exists());
    assert!(dst.exists());

    // The journal lists exactly one committed move.
    let output = bin(data.path(), &cfg)
        .args(["rollback", "list"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("cli_move.txt"), "stdout: {stdout}");
    assert!(stdout.contains("committed"), "stdout: {stdout}");

    bin(data.path(), &cfg)
        .args(["rollback", "last"])
        .assert()
        .success();
    assert!(src.exists(), "rollback last must restore the source");
    assert!(!dst.exists());
}

#[test]
#[serial]
fn rollback_last_with_nothing_to_undo_is_not_an_error() {
    let data = tempdir().unwrap();
    let cfg = data.path().join("no-config.xml");

    let output = bin(data.path(), &cfg)
        .args(["rollback", "last"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Nothing to undo"), "stdout: {stdout}");
}

#[test]
#[serial]
fn clear_then_clear_again_is_quiet() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let cfg = data.path().join("no-config.xml");

    let src = work.path().join("c.txt");
    fs::write(&src, b"x").unwrap();
    bin(data.path(), &cfg)
        .arg("move")
        .arg(&src)
        .arg(work.path().join("out").join("c.txt"))
        .assert()
        .success();

    bin(data.path(), &cfg).args(["rollback", "clear"]).assert().success();
    bin(data.path(), &cfg).args(["rollback", "clear"]).assert().success();

    let output = bin(data.path(), &cfg)
        .args(["rollback", "list"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Journal is empty"), "stdout: {stdout}");
}

#[test]
#[serial]
fn failed_move_exits_nonzero() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let cfg = data.path().join("no-config.xml");

    let status = StdCommand::new(assert_cmd::cargo::cargo_bin("tidy_move"))
        .env("TIDY_MOVE_CONFIG", &cfg)
        .arg("--data-dir")
        .arg(data.path())
        .arg("move")
        .arg(work.path().join("does_not_exist.bin"))
        .arg(work.path().join("out").join("does_not_exist.bin"))
        .status()
        .unwrap();
    assert!(!status.success(), "a move that cannot commit must exit nonzero");
}
