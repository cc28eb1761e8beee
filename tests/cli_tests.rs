//! Integration tests for the drsx binary.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn drsx_cmd() -> Command {
    cargo_bin_cmd!("drsx")
}

/// Payload bytes for a fixture file.
fn payload(id: u32, size: u32) -> Vec<u8> {
    (0..size).map(|i| ((id + i) % 256) as u8).collect()
}

/// Build an archive with one table per `(extension, files)`, payloads packed
/// after the directory.
fn build_archive(tables: &[(&str, &[(u32, u32)])]) -> Vec<u8> {
    let descriptors_end = 64 + tables.len() as u32 * 12;
    let entries: u32 = tables.iter().map(|(_, files)| files.len() as u32).sum();
    let directory_end = descriptors_end + entries * 12;

    let mut out = Vec::new();
    let mut copyright = b"Copyright (c) 1997 Ensemble Studios.".to_vec();
    copyright.resize(40, 0);
    out.extend_from_slice(&copyright);
    out.extend_from_slice(b"1.00");
    out.extend_from_slice(b"tribe\0\0\0\0\0\0\0");
    out.extend_from_slice(&(tables.len() as u32).to_le_bytes());
    out.extend_from_slice(&directory_end.to_le_bytes());

    let mut table_offset = descriptors_end;
    for (extension, files) in tables {
        let ext = extension.as_bytes();
        out.extend_from_slice(&[b'a', ext[2], ext[1], ext[0]]);
        out.extend_from_slice(&table_offset.to_le_bytes());
        out.extend_from_slice(&(files.len() as u32).to_le_bytes());
        table_offset += files.len() as u32 * 12;
    }

    let mut file_offset = directory_end;
    for (_, files) in tables {
        for &(id, size) in *files {
            out.extend_from_slice(&id.to_le_bytes());
            out.extend_from_slice(&file_offset.to_le_bytes());
            out.extend_from_slice(&size.to_le_bytes());
            file_offset += size;
        }
    }

    for (_, files) in tables {
        for &(id, size) in *files {
            out.extend_from_slice(&payload(id, size));
        }
    }

    out
}

fn write_archive(dir: &Path, name: &str, tables: &[(&str, &[(u32, u32)])]) {
    std::fs::write(dir.join(name), build_archive(tables)).expect("failed to write archive");
}

#[test]
fn test_help_flag() {
    drsx_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Extract files from DRS"));
}

#[test]
fn test_extract_archive() {
    let temp = TempDir::new().expect("failed to create temp dir");
    write_archive(temp.path(), "graphics.drs", &[("slp", &[(100, 10), (101, 20)])]);

    drsx_cmd()
        .current_dir(temp.path())
        .arg("graphics.drs")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 files"));

    let out = temp.path().join("extracted").join("graphics");
    assert_eq!(std::fs::read(out.join("100.slp")).unwrap(), payload(100, 10));
    assert_eq!(std::fs::read(out.join("101.slp")).unwrap(), payload(101, 20));
}

#[test]
fn test_extract_dir_option() {
    let temp = TempDir::new().expect("failed to create temp dir");
    write_archive(temp.path(), "sounds.drs", &[("wav", &[(5, 8)])]);
    let root = temp.path().join("out");

    drsx_cmd()
        .arg("-q")
        .arg("-d")
        .arg(&root)
        .arg(temp.path().join("sounds.drs"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(root.join("sounds").join("5.wav").is_file());
}

#[test]
fn test_too_small_archive_fails() {
    let temp = TempDir::new().expect("failed to create temp dir");
    std::fs::write(temp.path().join("tiny.drs"), [0u8; 10]).unwrap();

    drsx_cmd()
        .current_dir(temp.path())
        .arg("tiny.drs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("too small"));

    assert!(!temp.path().join("extracted").exists());
}

#[test]
fn test_batch_continues_after_failure() {
    let temp = TempDir::new().expect("failed to create temp dir");
    std::fs::write(temp.path().join("broken.drs"), [0u8; 30]).unwrap();
    write_archive(temp.path(), "border.drs", &[("bin", &[(1, 3)])]);

    drsx_cmd()
        .current_dir(temp.path())
        .args(["broken.drs", "border.drs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 2 archives"));

    assert!(temp.path().join("extracted").join("border").join("1.bin").is_file());
}

#[test]
fn test_list_tables() {
    let temp = TempDir::new().expect("failed to create temp dir");
    write_archive(
        temp.path(),
        "graphics.drs",
        &[("slp", &[(100, 10), (101, 20)]), ("wav", &[(7, 3)])],
    );

    drsx_cmd()
        .current_dir(temp.path())
        .args(["-l", "graphics.drs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("slp"))
        .stdout(predicate::str::contains("wav"))
        .stdout(predicate::str::contains("tribe"));

    assert!(!temp.path().join("extracted").exists());
}

#[test]
fn test_list_verbose() {
    let temp = TempDir::new().expect("failed to create temp dir");
    write_archive(temp.path(), "graphics.drs", &[("slp", &[(100, 10), (101, 20)])]);

    drsx_cmd()
        .current_dir(temp.path())
        .args(["-v", "graphics.drs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100.slp"))
        .stdout(predicate::str::contains("101.slp"))
        .stdout(predicate::str::contains("2 files"));
}

#[test]
fn test_blocked_output_directory_is_reported() {
    let temp = TempDir::new().expect("failed to create temp dir");
    write_archive(temp.path(), "graphics.drs", &[("slp", &[(100, 10)])]);
    std::fs::create_dir(temp.path().join("extracted")).unwrap();
    std::fs::write(temp.path().join("extracted").join("graphics"), b"file").unwrap();

    drsx_cmd()
        .current_dir(temp.path())
        .arg("graphics.drs")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 files"))
        .stderr(predicate::str::contains("cannot create directory"))
        .stderr(predicate::str::contains("cannot open output file"));
}
