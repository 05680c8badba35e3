//! Integration tests for the `owlgen` binary.
//!
//! Runs the built binary in a temporary working directory and checks exit
//! codes, progress output and written files.

#![allow(non_snake_case)]

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

const SCHEMA: &str = r#"[{"name": "Point", "kind": "struct", "fields": {"x": "u32", "y": "u32"}}]"#;

fn owlgen(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_owlgen"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write_config(dir: &TempDir) {
    fs::create_dir_all(dir.path().join("template")).unwrap();
    fs::write(dir.path().join("template/model.json"), SCHEMA).unwrap();
    fs::write(
        dir.path().join("owlgen.toml"),
        "[generator]\nverify = true\n\n[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();
}

#[test]
fn generate___default_config_file___writes_artifacts() {
    let dir = TempDir::new().unwrap();
    write_config(&dir);

    let output = owlgen(&dir, &["generate"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ Entries: 1"));
    let native = fs::read_to_string(dir.path().join("src/model_generated.rs")).unwrap();
    assert!(native.contains("pub struct Point {"));
    assert!(dir.path().join("pyhornedowl/model/model.pyi.in").exists());
}

#[test]
fn generate___missing_schema___exit_code_two() {
    let dir = TempDir::new().unwrap();

    let output = owlgen(&dir, &["generate", "--schema", "absent.json"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn generate___broken_template___exit_code_three() {
    let dir = TempDir::new().unwrap();
    write_config(&dir);
    let templates = dir.path().join("tpl");
    fs::create_dir_all(&templates).unwrap();
    fs::write(templates.join("header.rs.tera"), "{% if %}").unwrap();

    let output = owlgen(&dir, &["generate", "--templates", "tpl"]);

    assert_eq!(output.status.code(), Some(3));
    assert!(!dir.path().join("src/model_generated.rs").exists());
}

#[test]
fn check___valid_project___reports_counts() {
    let dir = TempDir::new().unwrap();
    write_config(&dir);

    let output = owlgen(&dir, &["check"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ Entries: 1 (1 structs, 0 enums)"));
    assert!(stdout.contains("Configuration is valid!"));
}

#[test]
fn check___explicit_missing_config___exit_code_one() {
    let dir = TempDir::new().unwrap();

    let output = owlgen(&dir, &["check", "-c", "missing.toml"]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn stubs___manifest___writes_package() {
    let dir = TempDir::new().unwrap();
    write_config(&dir);
    let manifest = r#"{"name": "pyhornedowl", "types": [{"name": "PyIndexedOntology"}],
        "submodules": [{"name": "model", "style": "hooked", "types": [{"name": "Point"}]}]}"#;
    fs::write(dir.path().join("exports.json"), manifest).unwrap();

    let output = owlgen(
        &dir,
        &["stubs", "--exports", "exports.json", "--out", "out", "--schema", "template/model.json"],
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let model = fs::read_to_string(dir.path().join("out/pyhornedowl/model/__init__.pyi")).unwrap();
    assert!(model.contains("class Point:\n    x: int\n    y: int\n"));
    assert!(dir.path().join("out/pyhornedowl/py.typed").exists());
}

#[test]
fn invalid_log_level___fails() {
    let dir = TempDir::new().unwrap();

    let output = owlgen(&dir, &["check", "--log-level", "loud"]);

    assert_eq!(output.status.code(), Some(1));
}
