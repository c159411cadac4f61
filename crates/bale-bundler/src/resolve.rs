//! Import specifier resolution.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use bale_config::{BuildSpec, is_bare_specifier};
use path_clean::PathClean;

use crate::plugins::PluginRegistry;
use crate::runtime::Runtime;
use crate::{Error, Result};

const FILE_SUFFIXES: [&str; 2] = [".mjs", ".js"];
const INDEX_FILES: [&str; 2] = ["index.mjs", "index.js"];

/// Where an import specifier points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A source file inlined into the bundle
    Local(PathBuf),
    /// A declared external, referenced by its specifier at runtime
    External(String),
}

/// Resolves specifiers against the filesystem, the external set, then plugins.
#[derive(Debug)]
pub struct ModuleResolver<'a> {
    spec: &'a BuildSpec,
    plugins: &'a PluginRegistry,
    runtime: &'a dyn Runtime,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(spec: &'a BuildSpec, plugins: &'a PluginRegistry, runtime: &'a dyn Runtime) -> Self {
        Self {
            spec,
            plugins,
            runtime,
        }
    }

    pub fn resolve(&self, specifier: &str, importer: &Path) -> Result<Resolved> {
        if !is_bare_specifier(specifier) {
            let base = importer.parent().unwrap_or(importer);
            return self
                .resolve_path(&base.join(specifier).clean())
                .map(Resolved::Local)
                .ok_or_else(|| unresolved(specifier, importer));
        }

        if self.spec.resolve_external(specifier) {
            return Ok(Resolved::External(specifier.to_string()));
        }

        match self.plugins.resolve_id(specifier, importer)? {
            Some(path) => Ok(Resolved::Local(path.clean())),
            None => Err(unresolved(specifier, importer)),
        }
    }

    fn resolve_path(&self, candidate: &Path) -> Option<PathBuf> {
        if self.runtime.is_file(candidate) {
            return Some(candidate.to_path_buf());
        }
        FILE_SUFFIXES
            .iter()
            .map(|suffix| {
                let mut path = OsString::from(candidate.as_os_str());
                path.push(suffix);
                PathBuf::from(path)
            })
            .chain(INDEX_FILES.iter().map(|index| candidate.join(index)))
            .find(|path| self.runtime.is_file(path))
    }
}

fn unresolved(specifier: &str, importer: &Path) -> Error {
    Error::Resolution {
        specifier: specifier.to_string(),
        importer: importer.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::NativeRuntime;
    use bale_config::ModuleFormat;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/lib")).unwrap();
        fs::write(dir.path().join("src/parser.js"), "").unwrap();
        fs::write(dir.path().join("src/tokens.mjs"), "").unwrap();
        fs::write(dir.path().join("src/lib/index.js"), "").unwrap();
        dir
    }

    fn spec() -> BuildSpec {
        BuildSpec::new("src/parser.js")
            .output(ModuleFormat::Es, "dist/index.js")
            .external(["@lezer/lr", "@lezer/common"])
    }

    #[test]
    fn relative_specifiers_try_suffixes_then_index() {
        let dir = fixture();
        let spec = spec();
        let plugins = PluginRegistry::new();
        let resolver = ModuleResolver::new(&spec, &plugins, &NativeRuntime);
        let importer = dir.path().join("src/parser.js");

        assert_eq!(
            resolver.resolve("./tokens", &importer).unwrap(),
            Resolved::Local(dir.path().join("src/tokens.mjs"))
        );
        assert_eq!(
            resolver.resolve("./lib", &importer).unwrap(),
            Resolved::Local(dir.path().join("src/lib/index.js"))
        );
        assert_eq!(
            resolver.resolve("../src/parser.js", &importer).unwrap(),
            Resolved::Local(dir.path().join("src/parser.js"))
        );
    }

    #[test]
    fn bare_specifiers_match_external_package_root() {
        let dir = fixture();
        let spec = spec();
        let plugins = PluginRegistry::new();
        let resolver = ModuleResolver::new(&spec, &plugins, &NativeRuntime);
        let importer = dir.path().join("src/parser.js");

        assert_eq!(
            resolver.resolve("@lezer/lr", &importer).unwrap(),
            Resolved::External("@lezer/lr".into())
        );
        assert_eq!(
            resolver.resolve("@lezer/common/dist/index.js", &importer).unwrap(),
            Resolved::External("@lezer/common/dist/index.js".into())
        );
    }

    #[test]
    fn unmatched_bare_specifier_is_a_resolution_error() {
        let dir = fixture();
        let spec = spec();
        let plugins = PluginRegistry::new();
        let resolver = ModuleResolver::new(&spec, &plugins, &NativeRuntime);
        let importer = dir.path().join("src/parser.js");

        match resolver.resolve("@lezer/highlight", &importer).unwrap_err() {
            Error::Resolution {
                specifier,
                importer: from,
            } => {
                assert_eq!(specifier, "@lezer/highlight");
                assert_eq!(from, importer);
            }
            other => panic!("expected Resolution error, got {other:?}"),
        }
    }

    #[test]
    fn missing_relative_file_is_a_resolution_error() {
        let dir = fixture();
        let spec = spec();
        let plugins = PluginRegistry::new();
        let resolver = ModuleResolver::new(&spec, &plugins, &NativeRuntime);

        let err = resolver
            .resolve("./missing", &dir.path().join("src/parser.js"))
            .unwrap_err();
        assert!(matches!(err, Error::Resolution { .. }));
    }
}
