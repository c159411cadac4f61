//! File-based descriptor discovery for CLI use
//!
//! Handles finding and loading build descriptors from the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Format, Json, Toml};
use serde_json::Value;
use tracing::debug;

use crate::build_spec::{BuildSpec, RawBuildSpec};
use crate::error::{ConfigError, Result};

/// Descriptor file names, in lookup order
pub const CONFIG_FILE_NAMES: &[&str] = &["bale.toml", "bale.config.json"];

/// File-based descriptor discovery
///
/// Library users should prefer `BuildSpec::from_value()`.
///
/// # Example
///
/// ```no_run
/// use bale_config::ConfigDiscovery;
///
/// let spec = ConfigDiscovery::new(".").load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a descriptor in the root directory
    ///
    /// Searches in this order:
    /// 1. bale.toml
    /// 2. bale.config.json
    /// 3. package.json (bale field)
    pub fn find(&self) -> Option<PathBuf> {
        for name in CONFIG_FILE_NAMES {
            let path = self.root.join(name);
            if path.is_file() {
                return Some(path);
            }
        }

        let pkg_path = self.root.join("package.json");
        let content = fs::read_to_string(&pkg_path).ok()?;
        let parsed: Value = serde_json::from_str(&content).ok()?;
        match parsed.get("bale") {
            Some(field) if !field.is_null() => Some(pkg_path),
            _ => None,
        }
    }

    /// Load the discovered descriptor
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no descriptor is found.
    pub fn load(&self) -> Result<BuildSpec> {
        let path = self.find().ok_or_else(|| ConfigError::NotFound {
            root: self.root.clone(),
        })?;
        load_from_path(&path)
    }
}

/// Load a descriptor from a specific file.
///
/// The format follows the file: `package.json` reads its `bale` field,
/// `.json` files are JSON, anything else is TOML.
pub fn load_from_path(path: &Path) -> Result<BuildSpec> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            root: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), "loading build descriptor");

    if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
        return load_from_package_json(path);
    }

    let figment = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Figment::from(Json::file(path)),
        _ => Figment::from(Toml::file(path)),
    };

    let raw: RawBuildSpec = figment.extract().map_err(|e| ConfigError::InvalidValue {
        field: figment_field(&e),
        hint: Some(e.to_string()),
    })?;

    BuildSpec::try_from(raw)
}

fn load_from_package_json(path: &Path) -> Result<BuildSpec> {
    let content = fs::read_to_string(path)?;

    let parsed: Value = serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
        field: "package.json".to_string(),
        hint: Some(format!("Invalid JSON: {e}")),
    })?;

    match parsed.get("bale") {
        Some(value) if !value.is_null() => BuildSpec::from_value(value.clone()),
        _ => Err(ConfigError::MissingField {
            field: "bale".to_string(),
        }),
    }
}

fn figment_field(error: &figment::Error) -> String {
    if error.path.is_empty() {
        "descriptor".to_string()
    } else {
        error.path.join(".")
    }
}
