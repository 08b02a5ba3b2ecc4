// file: tests/cli_test.rs
// version: 1.0.0
// guid: 4b8d2e6f-1a3c-4e9b-8d70-c5f2a91e3b64

//! Command line tests for the ISO customizer binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn customizer() -> Command {
    Command::cargo_bin("ubuntu-iso-customizer").unwrap()
}

#[test]
fn test_encode_then_decode_via_stdin() {
    let template = "-V 'Ubuntu 20.04.1 LTS amd64' -J -joliet-long";

    let encoded = customizer()
        .args(["--quiet", "encode", template])
        .assert()
        .success()
        .stdout(predicate::str::is_match("^[0-9A-F]+\n$").unwrap())
        .get_output()
        .stdout
        .clone();

    customizer()
        .args(["--quiet", "decode"])
        .write_stdin(encoded)
        .assert()
        .success()
        .stdout(format!("{}\n", template));
}

#[test]
fn test_decode_rejects_garbage() {
    customizer()
        .args(["--quiet", "decode", "not-hex"])
        .assert()
        .failure();
}

#[test]
fn test_template_from_saved_report() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.iso");
    std::fs::write(&source, vec![7u8; 8 * 2048]).unwrap();
    let report = dir.path().join("report.txt");
    std::fs::write(
        &report,
        "-V 'Ubuntu'\n--modification-date='2020073116511200'\n-isohybrid-mbr --interval:local_fs:0s-3s:zero_mbrpt:'/isos/src.iso'\n-part_like_isohybrid\n",
    )
    .unwrap();
    let work_dir = dir.path().join("work");

    // Act
    let assert = customizer()
        .arg("--quiet")
        .arg("template")
        .arg("--report")
        .arg(&report)
        .arg("--source")
        .arg(&source)
        .arg("--work-dir")
        .arg(&work_dir)
        .assert();

    // Assert
    assert.success().stdout(format!(
        "-V 'Ubuntu' -isohybrid-mbr --interval:local_fs:0s-3s:zero_mbrpt:'{}' -appended_part_as_gpt\n",
        work_dir.join("partition-1.img").display()
    ));
    let image = std::fs::read(work_dir.join("partition-1.img")).unwrap();
    assert_eq!(image.len(), 4 * 2048);
}

#[test]
fn test_template_format_error_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source.iso");
    std::fs::write(&source, b"x").unwrap();

    customizer()
        .arg("template")
        .arg("--report")
        .arg("-")
        .arg("--source")
        .arg(&source)
        .arg("--work-dir")
        .arg(dir.path().join("work"))
        .write_stdin("-V 'x'\n-c --interval:local_fs:0s-3s\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn test_template_requires_report_or_iso() {
    customizer()
        .args(["template", "--work-dir", "/tmp/work"])
        .assert()
        .failure();
}
