//! Integration tests for the build and check commands.
//!
//! These run against real project directories on disk, both through the
//! command functions and through the `bale` binary.

use assert_cmd::Command;
use bale_cli::cli::{BuildArgs, CheckArgs, ProjectArgs};
use bale_cli::commands::{build, check};
use bale_cli::error::CliError;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DESCRIPTOR: &str = r#"entry = "./src/parser.js"
external = ["@lezer/lr", "@lezer/common", "@lezer/highlight"]

[[output]]
format = "cjs"
file = "./dist/index.cjs"

[[output]]
format = "es"
file = "./dist/index.js"

[[plugins]]
name = "node-resolve"
"#;

fn write(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn grammar_project(descriptor: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "bale.toml", descriptor);
    write(
        root,
        "src/parser.js",
        "import { LRParser } from \"@lezer/lr\";\nimport { keywords } from \"./tokens.js\";\nexport const parser = LRParser.deserialize({ keywords });\n",
    );
    write(root, "src/tokens.js", "export const keywords = [\"zen\"];\n");
    temp
}

fn project_args(root: &Path) -> ProjectArgs {
    ProjectArgs {
        config: None,
        cwd: Some(root.to_path_buf()),
    }
}

fn bale() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bale"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[tokio::test]
async fn build_writes_both_outputs() {
    let temp = grammar_project(DESCRIPTOR);
    let args = BuildArgs {
        project: project_args(temp.path()),
    };

    build::execute(args).await.expect("build should succeed");

    let cjs = fs::read_to_string(temp.path().join("dist/index.cjs")).unwrap();
    let esm = fs::read_to_string(temp.path().join("dist/index.js")).unwrap();
    assert!(cjs.contains("require(\"@lezer/lr\")"));
    assert!(!cjs.contains("@lezer/highlight"));
    assert!(esm.contains("from \"@lezer/lr\""));
    assert!(esm.contains("export { parser };"));
}

#[tokio::test]
async fn build_with_missing_entry_writes_nothing() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "bale.toml", DESCRIPTOR);
    let args = BuildArgs {
        project: project_args(temp.path()),
    };

    let err = build::execute(args).await.unwrap_err();

    assert!(matches!(err, CliError::Build(bale_bundler::Error::Config(_))));
    assert!(!temp.path().join("dist").exists());
}

#[tokio::test]
async fn check_accepts_a_valid_descriptor() {
    let temp = grammar_project(DESCRIPTOR);
    let args = CheckArgs {
        project: project_args(temp.path()),
    };

    check::execute(args).await.expect("check should succeed");
    assert!(!temp.path().join("dist").exists());
}

#[tokio::test]
async fn check_rejects_unknown_plugins() {
    let temp = grammar_project(&format!("{DESCRIPTOR}\n[[plugins]]\nname = \"terser\"\n"));
    let args = CheckArgs {
        project: project_args(temp.path()),
    };

    let err = check::execute(args).await.unwrap_err();
    match err {
        CliError::Build(bale_bundler::Error::Config(config)) => {
            assert_eq!(config.field(), Some("plugins[1].name"));
        }
        other => panic!("expected plugin config error, got {other:?}"),
    }
}

#[test]
fn binary_builds_from_explicit_config() {
    let temp = grammar_project(DESCRIPTOR);
    fs::rename(temp.path().join("bale.toml"), temp.path().join("release.toml")).unwrap();

    bale()
        .args(["build", "--no-color", "--config", "release.toml", "--cwd"])
        .arg(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("dist/index.cjs"));

    assert!(temp.path().join("dist/index.cjs").is_file());
    assert!(temp.path().join("dist/index.js").is_file());
}

#[test]
fn binary_warns_about_unused_externals() {
    let temp = grammar_project(DESCRIPTOR);

    bale()
        .args(["build", "--cwd"])
        .arg(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("@lezer/common is declared external but never imported"));
}

#[test]
fn quiet_build_prints_nothing() {
    let temp = grammar_project(DESCRIPTOR);

    bale()
        .args(["--quiet", "build", "--cwd"])
        .arg(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    assert!(temp.path().join("dist/index.cjs").is_file());
}

#[test]
fn quiet_still_reports_errors() {
    let temp = grammar_project(&DESCRIPTOR.replacen("format = \"cjs\"", "format = \"umd\"", 1));

    bale()
        .args(["--quiet", "build", "--cwd"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("umd"));
}

#[test]
fn binary_rejects_unsupported_format() {
    let temp = grammar_project(&DESCRIPTOR.replacen("format = \"cjs\"", "format = \"umd\"", 1));

    bale()
        .args(["build", "--no-color", "--cwd"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("umd"));

    assert!(!temp.path().join("dist").exists());
}

#[test]
fn binary_reports_missing_descriptor() {
    let temp = TempDir::new().unwrap();

    bale()
        .args(["check", "--no-color", "--cwd"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no build descriptor found"));
}

#[test]
fn binary_help_lists_commands() {
    bale()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build").and(predicate::str::contains("check")));
}
