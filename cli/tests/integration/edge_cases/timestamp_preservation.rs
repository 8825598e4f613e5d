//! Metadata preservation integration tests for cpf CLI.
//!
//! These tests verify that metadata follows the data:
//! - Modification and access time preservation (and `--no-times`)
//! - Permission preservation (and `--no-perms`)

use assert_cmd::cargo::cargo_bin_cmd;
use std::fs::{self, File, FileTimes};
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// A fixed point well in the past
fn past() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_300_000_000)
}

fn backdate(path: &Path) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_times(FileTimes::new().set_accessed(past()).set_modified(past()))
        .unwrap();
}

fn get_mtime(path: &Path) -> SystemTime {
    fs::metadata(path).unwrap().modified().unwrap()
}

#[test]
fn test_modification_time_preserved() {
    for sync in [false, true] {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();

        fs::write(src.path().join("test.txt"), "content").unwrap();
        backdate(&src.path().join("test.txt"));

        let mut cmd = cargo_bin_cmd!("cpf");
        if sync {
            cmd.arg("--sync");
        }
        cmd.arg(src.path().join("test.txt"))
            .arg(dst.path().join("test.txt"))
            .assert()
            .success();

        assert_eq!(get_mtime(&dst.path().join("test.txt")), past());
    }
}

#[test]
fn test_access_time_preserved() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("test.txt"), "content").unwrap();
    backdate(&src.path().join("test.txt"));

    let mut cmd = cargo_bin_cmd!("cpf");
    cmd.arg(src.path().join("test.txt"))
        .arg(dst.path().join("test.txt"))
        .assert()
        .success();

    // Times are applied after the data is written, so reading the
    // destination here is the first access since
    let accessed = fs::metadata(dst.path().join("test.txt"))
        .unwrap()
        .accessed()
        .unwrap();
    assert_eq!(accessed, past());
}

#[test]
fn test_no_times_leaves_fresh_mtime() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("test.txt"), "content").unwrap();
    backdate(&src.path().join("test.txt"));

    let mut cmd = cargo_bin_cmd!("cpf");
    cmd.arg("--no-times")
        .arg(src.path().join("test.txt"))
        .arg(dst.path().join("test.txt"))
        .assert()
        .success();

    assert!(get_mtime(&dst.path().join("test.txt")) > past());
}

#[cfg(unix)]
#[test]
fn test_permissions_preserved() {
    use std::os::unix::fs::PermissionsExt;

    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    let file = src.path().join("script.sh");
    fs::write(&file, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&file, fs::Permissions::from_mode(0o750)).unwrap();

    let mut cmd = cargo_bin_cmd!("cpf");
    cmd.arg(&file)
        .arg(dst.path().join("script.sh"))
        .assert()
        .success();

    let mode = fs::metadata(dst.path().join("script.sh"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o750);
}

#[cfg(unix)]
#[test]
fn test_no_perms_keeps_creation_mode() {
    use std::os::unix::fs::PermissionsExt;

    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    let file = src.path().join("script.sh");
    fs::write(&file, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&file, fs::Permissions::from_mode(0o700)).unwrap();

    let mut cmd = cargo_bin_cmd!("cpf");
    cmd.arg("--no-perms")
        .arg("--clone")
        .arg("never")
        .arg(&file)
        .arg(dst.path().join("script.sh"))
        .assert()
        .success();

    let mode = fs::metadata(dst.path().join("script.sh"))
        .unwrap()
        .permissions()
        .mode();
    assert_ne!(mode & 0o777, 0o700);
}
