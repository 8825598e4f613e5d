//! Boundary cases integration tests for cpf CLI.
//!
//! These tests verify behavior at edge cases and boundary conditions:
//! - Empty files
//! - Sizes around the 100 KiB copy buffer
//! - Files with special characters in names
//! - Binary content

use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use tempfile::TempDir;

const BUFFER_SIZE: usize = 100 * 1024;

fn copy_both_modes(name: &str, content: &[u8]) {
    for sync in [false, true] {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::write(src.path().join(name), content).unwrap();

        let mut cmd = cargo_bin_cmd!("cpf");
        if sync {
            cmd.arg("--sync");
        }
        cmd.arg("--clone")
            .arg("never")
            .arg(src.path().join(name))
            .arg(dst.path().join(name))
            .assert()
            .success();

        assert_eq!(fs::read(dst.path().join(name)).unwrap(), content);
    }
}

// =============================================================================
// Size Tests
// =============================================================================

/// Test copying an empty file (0 bytes).
#[test]
fn test_copy_empty_file() {
    copy_both_modes("empty.txt", b"");
}

#[test]
fn test_copy_single_byte() {
    copy_both_modes("one.bin", b"x");
}

/// Exactly one buffer: the loop needs a second, empty read to finish.
#[test]
fn test_copy_exact_buffer_size() {
    copy_both_modes("exact.bin", &vec![b'a'; BUFFER_SIZE]);
}

/// A multiple of the buffer plus one byte ends on a short read.
#[test]
fn test_copy_buffer_multiple_plus_one() {
    let content: Vec<u8> = (0..3 * BUFFER_SIZE + 1).map(|i| (i % 251) as u8).collect();
    copy_both_modes("plus_one.bin", &content);
}

// =============================================================================
// Content Tests
// =============================================================================

#[test]
fn test_binary_content_all_bytes() {
    let content: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    copy_both_modes("binary.bin", &content);
}

#[test]
fn test_file_with_null_bytes() {
    copy_both_modes("nulls.bin", &[0u8; 1024]);
}

// =============================================================================
// Filename Tests
// =============================================================================

#[test]
fn test_filename_with_spaces() {
    copy_both_modes("file with spaces.txt", b"spaces");
}

#[test]
fn test_filename_with_unicode() {
    copy_both_modes("文件-файл-αρχείο.txt", b"unicode");
}

#[test]
fn test_hidden_file() {
    copy_both_modes(".hidden", b"hidden");
}

#[test]
fn test_long_filename() {
    let name = format!("{}.txt", "n".repeat(200));
    copy_both_modes(&name, b"long");
}
