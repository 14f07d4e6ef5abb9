//! Integration tests for scopex-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use scopex_core::formats::compression::CompressionCodec;
use scopex_core::test_utils::ExportFixture;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

const BATCH: &str = "20241010";

fn scopex_cmd() -> Command {
    cargo_bin_cmd!("scopex")
}

fn fixture() -> ExportFixture {
    ExportFixture::new()
        .with_archive("alice@org.co.uk", "takeout-001.zip", &[("Mail/all.mbox", b"alice mail")])
        .with_archive("bob@other.com", "takeout-001.zip", &[("Mail/all.mbox", b"bob mail")])
        .with_file("Resource: Room 4", "calendar.ics", b"ics")
}

fn write_tarball(temp: &TempDir) -> PathBuf {
    let source = temp.path().join("export.tar.xz");
    fs::write(&source, fixture().tarball(BATCH, Some(CompressionCodec::Xz))).unwrap();
    source
}

fn extract_cmd(source: &Path, dest: &Path) -> Command {
    let mut cmd = scopex_cmd();
    cmd.arg("--source")
        .arg(source)
        .arg("--destination")
        .arg(dest)
        .arg("--domain-suffix")
        .arg("@org.co.uk")
        .arg("--resource-prefix")
        .arg("Resource:");
    cmd
}

#[test]
fn test_version_flag() {
    scopex_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("scopex"));
}

#[test]
fn test_help_flag() {
    scopex_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--domain-suffix"))
        .stdout(predicate::str::contains("--remove-source"));
}

#[test]
fn test_missing_rules_fails() {
    let temp = TempDir::new().unwrap();
    let source = write_tarball(&temp);

    scopex_cmd()
        .arg("--source")
        .arg(&source)
        .arg("--destination")
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_zero_jobs_rejected() {
    let temp = TempDir::new().unwrap();
    let source = write_tarball(&temp);

    extract_cmd(&source, &temp.path().join("out"))
        .arg("--jobs")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn test_extract_tarball() {
    let temp = TempDir::new().unwrap();
    let source = write_tarball(&temp);
    let out = temp.path().join("out");

    extract_cmd(&source, &out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Extraction complete"))
        .stdout(predicate::str::contains("Scopes:"));

    let mbox = out.join(BATCH).join("alice@org.co.uk/Mail/all.mbox");
    assert_eq!(fs::read(mbox).unwrap(), b"alice mail");
    assert_eq!(
        fs::read(out.join(BATCH).join("Resource: Room 4/calendar.ics")).unwrap(),
        b"ics"
    );
    assert!(!out.join(BATCH).join("alice@org.co.uk/takeout-001.zip").exists());
    assert!(!out.join(BATCH).join("bob@other.com").exists());
    assert!(source.exists(), "source is kept without --remove-source");
}

#[test]
fn test_extract_json_output() {
    let temp = TempDir::new().unwrap();
    let source = write_tarball(&temp);
    let out = temp.path().join("out");

    let output = extract_cmd(&source, &out).arg("--json").output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["operation"], "extract");
    assert_eq!(value["status"], "success");
    assert_eq!(value["data"]["files_extracted"], 2);
    assert_eq!(value["data"]["archives_expanded"], 1);
    assert_eq!(
        value["data"]["scopes"],
        serde_json::json!(["Resource: Room 4", "alice@org.co.uk"])
    );
}

#[test]
fn test_quiet_prints_nothing() {
    let temp = TempDir::new().unwrap();
    let source = write_tarball(&temp);

    extract_cmd(&source, &temp.path().join("out"))
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_remove_source_deletes_tarball() {
    let temp = TempDir::new().unwrap();
    let source = write_tarball(&temp);
    let out = temp.path().join("out");

    extract_cmd(&source, &out)
        .arg("--remove-source")
        .assert()
        .success();

    assert!(!source.exists());
    assert!(out.join(BATCH).join("alice@org.co.uk/Mail/all.mbox").exists());
}

#[test]
fn test_directory_source_with_jobs() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("exploded");
    fixture().write_tree(&source);
    let out = temp.path().join("out");

    extract_cmd(&source, &out)
        .arg("--jobs")
        .arg("2")
        .arg("--remove-source")
        .assert()
        .success()
        .stdout(predicate::str::contains("--remove-source ignored"));

    assert_eq!(
        fs::read(out.join("alice@org.co.uk/Mail/all.mbox")).unwrap(),
        b"alice mail"
    );
    assert!(out.join("Resource: Room 4/calendar.ics").exists());
    assert!(!out.join("bob@other.com").exists());
    assert!(
        source.join("alice@org.co.uk/takeout-001.zip").exists(),
        "directory sources are never modified"
    );
}

#[test]
fn test_scope_depth_override() {
    let temp = TempDir::new().unwrap();
    let source = write_tarball(&temp);
    let out = temp.path().join("out");

    // Depth 1 points at the batch folder, which matches no rule.
    let output = extract_cmd(&source, &out)
        .arg("--scope-depth")
        .arg("1")
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["data"]["files_extracted"], 0);
    assert!(!out.join(BATCH).exists());
}

#[test]
fn test_missing_source_fails() {
    let temp = TempDir::new().unwrap();

    extract_cmd(&temp.path().join("missing.tar.xz"), &temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_unrecognized_source_fails() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("notes.txt");
    fs::write(&source, b"not an archive at all").unwrap();

    extract_cmd(&source, &temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Unrecognized export container"));
}

#[test]
fn test_corrupt_secondary_archive_fails() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("export.tar.gz");
    let tarball = ExportFixture::new()
        .with_file("alice@org.co.uk", "takeout-001.zip", b"this is not a zip")
        .tarball(BATCH, Some(CompressionCodec::Gzip));
    fs::write(&source, tarball).unwrap();
    let out = temp.path().join("out");

    extract_cmd(&source, &out)
        .arg("--remove-source")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("takeout-001.zip"));

    assert!(source.exists(), "source is kept when the run fails");
    assert!(out.join(BATCH).join("alice@org.co.uk/takeout-001.zip").exists());
}

#[test]
fn test_destination_same_as_directory_source_fails() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("exploded");
    fixture().write_tree(&source);
    let archive = source.join("alice@org.co.uk/takeout-001.zip");
    let before = fs::read(&archive).unwrap();

    extract_cmd(&source, &source)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("inside the source directory"));

    assert_eq!(fs::read(&archive).unwrap(), before);
}
