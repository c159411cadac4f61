//! Pluggable descriptor validation strategies
//!
//! Separates schema validation (no I/O) from filesystem validation, which
//! additionally checks that the entry is readable and the outputs writable.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::build_spec::BuildSpec;
use crate::error::{ConfigError, Result};

/// Trait for pluggable validation strategies
pub trait ConfigValidator {
    fn validate(&self, spec: &BuildSpec) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use bale_config::{BuildSpec, ConfigValidator, ModuleFormat, SchemaValidator};
///
/// let spec = BuildSpec::new("src/index.js").output(ModuleFormat::Cjs, "dist/index.cjs");
/// SchemaValidator.validate(&spec).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, spec: &BuildSpec) -> Result<()> {
        if spec.entry.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "entry".to_string(),
                hint: Some("entry path cannot be empty".to_string()),
            });
        }

        if spec.output.is_empty() {
            return Err(ConfigError::NoOutputs);
        }

        let mut seen = HashSet::new();
        for (idx, target) in spec.output.iter().enumerate() {
            let field = format!("output[{idx}].file");
            if target.file.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field,
                    hint: Some("output file cannot be empty".to_string()),
                });
            }

            let normalized = target.file.clean();
            if !seen.insert(normalized.clone()) {
                return Err(ConfigError::DuplicateOutput {
                    field,
                    path: normalized,
                });
            }
        }

        // External names must be non-empty package names
        for (idx, name) in spec.external.iter().enumerate() {
            if name.trim().is_empty() || name.trim() != name {
                return Err(ConfigError::SchemaValidation {
                    field: format!("external[{idx}]"),
                    message: format!("'{name}' is not a package name"),
                });
            }
        }

        for (idx, plugin) in spec.plugins.iter().enumerate() {
            if plugin.name.trim().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    field: format!("plugins[{idx}].name"),
                    message: "plugin name cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Filesystem validator
///
/// Runs schema validation, then checks that the entry is a readable file and
/// that every output can be created under `root`.
///
/// # Example
///
/// ```no_run
/// use bale_config::{BuildSpec, ConfigValidator, FsValidator, ModuleFormat};
///
/// let spec = BuildSpec::new("src/parser.js").output(ModuleFormat::Es, "dist/index.js");
/// FsValidator::new(".").validate(&spec).unwrap();
/// ```
pub struct FsValidator {
    root: PathBuf,
}

impl FsValidator {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, spec: &BuildSpec) -> Result<()> {
        SchemaValidator.validate(spec)?;

        let entry = spec.entry_path(&self.root);
        if !entry.exists() {
            return Err(ConfigError::EntryNotFound { path: entry });
        }
        if !entry.is_file() || fs::File::open(&entry).is_err() {
            return Err(ConfigError::EntryNotReadable { path: entry });
        }

        for (idx, path) in spec.output_paths(&self.root).into_iter().enumerate() {
            if !is_writable_target(&path) {
                return Err(ConfigError::OutputNotWritable {
                    field: format!("output[{idx}].file"),
                    path,
                });
            }
        }

        Ok(())
    }
}

/// A target is writable when it is not a directory and its nearest existing
/// ancestor is a writable directory.
fn is_writable_target(path: &Path) -> bool {
    if path.is_dir() {
        return false;
    }

    if let Ok(meta) = fs::metadata(path) {
        return !meta.permissions().readonly();
    }

    let mut ancestor = path.parent();
    while let Some(dir) = ancestor {
        if dir.as_os_str().is_empty() {
            break;
        }
        match fs::metadata(dir) {
            Ok(meta) => return meta.is_dir() && !meta.permissions().readonly(),
            Err(_) => ancestor = dir.parent(),
        }
    }

    // Relative path with no existing ancestor: falls back to the process cwd
    std::env::current_dir()
        .ok()
        .and_then(|cwd| fs::metadata(cwd).ok())
        .is_some_and(|meta| !meta.permissions().readonly())
}
