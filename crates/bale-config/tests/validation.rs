//! Tests for descriptor validation against the filesystem.

use bale_config::{BuildSpec, ConfigError, ConfigValidator, FsValidator, ModuleFormat};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn project_with_entry() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let src_dir = dir.path().join("src");
    fs::create_dir(&src_dir).expect("create src dir");
    fs::write(src_dir.join("parser.js"), "export const parser = {};").expect("write entry");
    dir
}

fn reference_spec() -> BuildSpec {
    BuildSpec::new("./src/parser.js")
        .output(ModuleFormat::Cjs, "./dist/index.cjs")
        .output(ModuleFormat::Es, "./dist/index.js")
        .external(["@lezer/lr", "@lezer/common", "@lezer/highlight"])
}

#[test]
fn validate_catches_missing_entry() {
    let dir = TempDir::new().expect("tempdir");
    let spec = BuildSpec::new("src/nonexistent.js").output(ModuleFormat::Es, "dist/index.js");

    match FsValidator::new(dir.path()).validate(&spec).unwrap_err() {
        ConfigError::EntryNotFound { path } => {
            assert!(path.ends_with("src/nonexistent.js"));
        }
        other => panic!("expected EntryNotFound error, got {other:?}"),
    }
}

#[test]
fn validate_rejects_directory_entry() {
    let dir = project_with_entry();
    let spec = BuildSpec::new("src").output(ModuleFormat::Es, "dist/index.js");

    let err = FsValidator::new(dir.path()).validate(&spec).unwrap_err();
    assert!(matches!(err, ConfigError::EntryNotReadable { .. }));
    assert_eq!(err.field(), Some("entry"));
}

#[test]
fn validate_succeeds_for_reference_descriptor() {
    let dir = project_with_entry();
    assert!(FsValidator::new(dir.path()).validate(&reference_spec()).is_ok());
}

#[test]
fn validate_does_not_create_output_directory() {
    let dir = project_with_entry();
    FsValidator::new(dir.path())
        .validate(&reference_spec())
        .expect("valid descriptor");
    assert!(!dir.path().join("dist").exists());
}

#[test]
fn validate_names_unwritable_output() {
    let dir = project_with_entry();
    // A regular file where the output directory should be
    fs::write(dir.path().join("dist"), "").expect("write blocker");

    match FsValidator::new(dir.path()).validate(&reference_spec()).unwrap_err() {
        ConfigError::OutputNotWritable { field, path } => {
            assert_eq!(field, "output[0].file");
            assert_eq!(path, dir.path().join("dist/index.cjs"));
        }
        other => panic!("expected OutputNotWritable error, got {other:?}"),
    }
}

#[test]
fn validate_rejects_output_that_is_a_directory() {
    let dir = project_with_entry();
    fs::create_dir_all(dir.path().join("dist/index.js")).expect("create dir");

    let err = FsValidator::new(dir.path())
        .validate(&reference_spec())
        .unwrap_err();
    assert_eq!(err.field(), Some("output[1].file"));
}

#[test]
fn validate_runs_schema_checks_first() {
    let dir = TempDir::new().expect("tempdir");
    let spec = BuildSpec::new("src/missing.js");

    let err = FsValidator::new(dir.path()).validate(&spec).unwrap_err();
    assert!(matches!(err, ConfigError::NoOutputs));
}

#[test]
fn unsupported_format_fails_before_any_file_access() {
    let value = serde_json::json!({
        "entry": "does/not/exist.js",
        "output": [{ "format": "umd", "file": "dist/index.umd.js" }]
    });

    let err = BuildSpec::from_value(value).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    assert_eq!(err.field(), Some("output[0].format"));
    assert!(!PathBuf::from("dist/index.umd.js").exists());
}
