//! Error handling integration tests for cpf CLI.
//!
//! These tests verify proper error handling behaviors:
//! - Directory and device sources are refused without touching the destination
//! - A file never replaces a directory
//! - Missing sources report ENOENT with the path
//! - Exit codes and the `error[CODE]` prefix

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_source_directory_fails_with_eisdir() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::create_dir(src.path().join("node_modules")).unwrap();

    let mut cmd = cargo_bin_cmd!("cpf");
    cmd.arg(src.path().join("node_modules"))
        .arg(dst.path().join("sub/x"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error[EISDIR]"))
        .stderr(predicate::str::contains("node_modules"));

    // Not even the parent directory was created
    assert!(!dst.path().join("sub").exists());
}

/// A file must never replace an existing directory.
#[test]
fn test_overwrite_directory_with_file_fails() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("testdir"), "file content").unwrap();
    fs::create_dir(dst.path().join("testdir")).unwrap();
    fs::write(dst.path().join("testdir/inside.txt"), "inside content").unwrap();

    let mut cmd = cargo_bin_cmd!("cpf");
    cmd.arg(src.path().join("testdir"))
        .arg(dst.path().join("testdir"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[EISDIR]"))
        .stderr(predicate::str::contains("cannot write to"));

    assert!(dst.path().join("testdir").is_dir());
    assert_eq!(
        fs::read_to_string(dst.path().join("testdir/inside.txt")).unwrap(),
        "inside content"
    );
}

#[test]
fn test_missing_source_fails_with_enoent() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("cpf");
    cmd.arg(src.path().join("NO_ENTRY"))
        .arg(dst.path().join("out/copy"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error[ENOENT]"))
        .stderr(predicate::str::contains("NO_ENTRY"));

    assert!(!dst.path().join("out").exists());
}

#[test]
fn test_missing_source_same_error_in_both_modes() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    let run = |sync: bool| {
        let mut cmd = cargo_bin_cmd!("cpf");
        if sync {
            cmd.arg("--sync");
        }
        let output = cmd
            .arg(src.path().join("NO_ENTRY"))
            .arg(dst.path().join("copy"))
            .output()
            .unwrap();
        String::from_utf8(output.stderr).unwrap()
    };

    assert_eq!(run(true), run(false));
}

#[test]
fn test_json_error_output() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("cpf");
    let output = cmd
        .arg("--json")
        .arg(src.path().join("NO_ENTRY"))
        .arg(dst.path().join("copy"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "failed");
    assert_eq!(value["errorCode"], "ENOENT");
}

#[test]
fn test_invalid_directory_mode_is_usage_error() {
    let src = TempDir::new().unwrap();
    fs::write(src.path().join("test.txt"), "content").unwrap();

    let mut cmd = cargo_bin_cmd!("cpf");
    cmd.arg("--directory-mode")
        .arg("rwx")
        .arg(src.path().join("test.txt"))
        .arg(src.path().join("copy.txt"))
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("not an octal mode"));
}

#[test]
fn test_missing_destination_operand() {
    let src = TempDir::new().unwrap();
    fs::write(src.path().join("test.txt"), "content").unwrap();

    let mut cmd = cargo_bin_cmd!("cpf");
    cmd.arg(src.path().join("test.txt"))
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_forced_clone_either_clones_or_fails_cleanly() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("test.txt"), "cow").unwrap();

    let mut cmd = cargo_bin_cmd!("cpf");
    let output = cmd
        .arg("--clone")
        .arg("force")
        .arg(src.path().join("test.txt"))
        .arg(dst.path().join("test.txt"))
        .output()
        .unwrap();

    if output.status.success() {
        assert_eq!(
            fs::read_to_string(dst.path().join("test.txt")).unwrap(),
            "cow"
        );
    } else {
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("cannot clone to"));
        assert!(!dst.path().join("test.txt").exists());
    }
}

/// A refused clone must not cost the caller the file already in place.
#[test]
fn test_forced_clone_over_existing_keeps_destination() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("test.txt"), "replacement").unwrap();
    fs::write(dst.path().join("test.txt"), "precious").unwrap();

    let mut cmd = cargo_bin_cmd!("cpf");
    cmd.arg("--clone")
        .arg("force")
        .arg(src.path().join("test.txt"))
        .arg(dst.path().join("test.txt"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot clone to"));

    assert_eq!(
        fs::read_to_string(dst.path().join("test.txt")).unwrap(),
        "precious"
    );
}

#[cfg(unix)]
#[test]
fn test_device_source_is_refused() {
    if !std::path::Path::new("/dev/zero").exists() {
        eprintln!("SKIP: /dev/zero is not available");
        return;
    }
    let dst = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("cpf");
    cmd.arg("/dev/zero")
        .arg(dst.path().join("zeros.bin"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error[EINVAL]"))
        .stderr(predicate::str::contains("not a regular file"));

    assert!(!dst.path().join("zeros.bin").exists());
}

#[cfg(unix)]
#[test]
fn test_unreadable_source_fails() {
    use std::os::unix::fs::PermissionsExt;

    // Root ignores permission bits
    if unsafe { libc::geteuid() } == 0 {
        eprintln!("SKIP: running as root");
        return;
    }

    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    let file = src.path().join("secret.txt");
    fs::write(&file, "secret").unwrap();
    fs::set_permissions(&file, fs::Permissions::from_mode(0o000)).unwrap();

    let mut cmd = cargo_bin_cmd!("cpf");
    cmd.arg("--clone")
        .arg("never")
        .arg(&file)
        .arg(dst.path().join("secret.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[EACCES]"))
        .stderr(predicate::str::contains("cannot read from"));

    fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();
}

#[cfg(unix)]
#[test]
fn test_unwritable_parent_fails() {
    use std::os::unix::fs::PermissionsExt;

    if unsafe { libc::geteuid() } == 0 {
        eprintln!("SKIP: running as root");
        return;
    }

    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("test.txt"), "content").unwrap();
    let locked = dst.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    let mut cmd = cargo_bin_cmd!("cpf");
    cmd.arg(src.path().join("test.txt"))
        .arg(locked.join("sub/test.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[EACCES]"))
        .stderr(predicate::str::contains("cannot create directory"));

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
}
