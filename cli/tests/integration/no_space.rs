//! No-space error integration tests for cpf CLI.
//!
//! These tests write into `/dev/full`, which accepts opens but fails every
//! write with `ENOSPC`. Platforms without it skip the tests.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn dev_full() -> Option<&'static Path> {
    let path = Path::new("/dev/full");
    if path.exists() {
        Some(path)
    } else {
        eprintln!("SKIP: /dev/full is not available");
        None
    }
}

fn source_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("payload.bin");
    fs::write(&path, "x".repeat(256 * 1024)).unwrap();
    path
}

#[test]
fn test_no_space_async() {
    let Some(full) = dev_full() else { return };
    let src = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("cpf");
    cmd.arg("--clone")
        .arg("never")
        .arg(source_file(&src))
        .arg(full)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error[ENOSPC]"))
        .stderr(predicate::str::contains("cannot write to `/dev/full`"));
}

#[test]
fn test_no_space_blocking() {
    let Some(full) = dev_full() else { return };
    let src = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("cpf");
    cmd.arg("--sync")
        .arg("--clone")
        .arg("never")
        .arg(source_file(&src))
        .arg(full)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error[ENOSPC]"))
        .stderr(predicate::str::contains("cannot write to `/dev/full`"));
}

#[test]
fn test_no_space_json_reports_code() {
    let Some(full) = dev_full() else { return };
    let src = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("cpf");
    let output = cmd
        .arg("--json")
        .arg("--clone")
        .arg("never")
        .arg(source_file(&src))
        .arg(full)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["errorCode"], "ENOSPC");
    assert_eq!(value["destination"], "/dev/full");
}
