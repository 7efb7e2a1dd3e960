use std::fs;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::tempdir;

fn cmd() -> Command {
    Command::cargo_bin("jsoncodec").unwrap()
}

#[test]
fn generates_sibling_files_for_a_schema_file() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("order.jsonrec");
    fs::write(
        &source,
        "record Order { id: int64, total: float64, tags: [string] }",
    )
    .unwrap();

    cmd().arg(&source).assert().success();

    let encoder = fs::read_to_string(dir.path().join("order_encoder.rs")).unwrap();
    let decoder = fs::read_to_string(dir.path().join("order_decoder.rs")).unwrap();
    assert!(encoder.contains("pub struct Order"));
    assert!(encoder.contains("OrderEncoder"));
    assert!(decoder.contains("OrderDecoder"));
}

#[test]
fn walks_a_directory_recursively() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.jsonrec"), "record A { x: string }").unwrap();
    let sub = dir.path().join("nested");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("b.jsonrec"), "record B { y: int32 }").unwrap();

    cmd().arg(dir.path()).assert().success();

    assert!(dir.path().join("a_encoder.rs").exists());
    assert!(sub.join("b_encoder.rs").exists());
}

#[test]
fn empty_schema_file_produces_no_output() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("empty.jsonrec");
    fs::write(&source, "").unwrap();

    cmd().arg(&source).assert().success();

    assert!(!dir.path().join("empty_encoder.rs").exists());
}

#[test]
fn malformed_schema_fails_with_a_diagnostic() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("bad.jsonrec");
    fs::write(&source, "record { x: string }").unwrap();

    cmd()
        .arg(&source)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn nonexistent_path_fails_with_a_diagnostic() {
    cmd()
        .arg("/does/not/exist.jsonrec")
        .assert()
        .failure()
        .stderr(contains("does not exist"));
}

#[test]
fn out_dir_overrides_the_default_sibling_location() {
    let source_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let source = source_dir.path().join("thing.jsonrec");
    fs::write(&source, "record Thing { n: int32 }").unwrap();

    cmd()
        .args([
            source.to_str().unwrap(),
            "--out-dir",
            out_dir.path().to_str().unwrap(),
        ])
        .assert()
        .success();

    assert!(out_dir.path().join("thing_encoder.rs").exists());
    assert!(!source_dir.path().join("thing_encoder.rs").exists());
}
