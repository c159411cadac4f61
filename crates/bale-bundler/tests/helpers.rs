//! Shared test utilities for bale-bundler tests

#![allow(dead_code)]

use bale_bundler::{BuildSpec, ModuleFormat, PluginRef};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Marker that only appears inside the fake external package sources.
pub const EXTERNAL_MARKER: &str = "LEZER_LR_INTERNALS";

/// Write `files` (relative path, contents) under a fresh temp dir.
pub fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    for (name, content) in files {
        write_file(dir.path(), name, content);
    }
    dir
}

pub fn write_file(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, content).expect("write fixture");
}

/// A grammar-package layout: a parser module importing two of the three
/// declared externals plus a local tokens module, with the externals also
/// installed under node_modules.
pub fn grammar_project() -> TempDir {
    project(&[
        (
            "src/parser.js",
            r#"import { LRParser } from "@lezer/lr";
import { styleTags, tags as t } from "@lezer/highlight";
import { keywords } from "./tokens.js";

export const parser = LRParser.deserialize({ keywords });

export const highlighting = styleTags({ Keyword: t.keyword });
"#,
        ),
        ("src/tokens.js", "export const keywords = [\"zen\", \"koan\"];\n"),
        (
            "node_modules/@lezer/lr/package.json",
            r#"{ "name": "@lezer/lr", "module": "dist/index.js", "main": "dist/index.cjs" }"#,
        ),
        (
            "node_modules/@lezer/lr/dist/index.js",
            "export const LEZER_LR_INTERNALS = 1;\nexport class LRParser {}\n",
        ),
        (
            "node_modules/@lezer/highlight/package.json",
            r#"{ "name": "@lezer/highlight", "module": "dist/index.js" }"#,
        ),
        (
            "node_modules/@lezer/highlight/dist/index.js",
            "export const LEZER_LR_INTERNALS = 2;\nexport function styleTags() {}\nexport const tags = {};\n",
        ),
    ])
}

/// The reference descriptor: two outputs, three externals, node-resolve.
pub fn reference_spec() -> BuildSpec {
    BuildSpec::new("./src/parser.js")
        .output(ModuleFormat::Cjs, "./dist/index.cjs")
        .output(ModuleFormat::Es, "./dist/index.js")
        .external(["@lezer/lr", "@lezer/common", "@lezer/highlight"])
        .plugin(PluginRef::new("node-resolve"))
}

/// String arguments of every `require("...")` call in `code`.
pub fn required_specifiers(code: &str) -> BTreeSet<String> {
    code.split("require(\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(str::to_string)
        .collect()
}

/// File names directly inside `dir`, sorted.
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
