//! The build descriptor.
//!
//! A `BuildSpec` names one entry module, the artifacts to produce from it,
//! the packages that stay unbundled and the resolver plugins to consult. It
//! is immutable once built: load or construct it, validate it, hand it to
//! the bundler, drop it.

use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use path_clean::PathClean;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result as ConfigResult};
use crate::external::package_root;
use crate::output::{ModuleFormat, OutputTarget};
use crate::plugin::PluginRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBuildSpec")]
pub struct BuildSpec {
    /// Source module to bundle
    pub entry: PathBuf,

    /// Artifacts to emit, in order
    pub output: Vec<OutputTarget>,

    /// Package names that are referenced at runtime instead of inlined
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub external: IndexSet<String>,

    /// Resolver plugins, consulted in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<PluginRef>,
}

impl BuildSpec {
    /// Start a descriptor for `entry` with no outputs yet.
    pub fn new(entry: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
            output: Vec::new(),
            external: IndexSet::new(),
            plugins: Vec::new(),
        }
    }

    pub fn output(mut self, format: ModuleFormat, file: impl Into<PathBuf>) -> Self {
        self.output.push(OutputTarget::new(format, file));
        self
    }

    pub fn external<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.external.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn plugin(mut self, plugin: PluginRef) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Create from serde_json::Value (for programmatic descriptors)
    ///
    /// # Example
    ///
    /// ```
    /// use bale_config::{BuildSpec, ModuleFormat};
    /// use serde_json::json;
    ///
    /// let spec = BuildSpec::from_value(json!({
    ///     "entry": "./src/parser.js",
    ///     "output": [
    ///         { "format": "cjs", "file": "./dist/index.cjs" },
    ///         { "format": "es", "file": "./dist/index.js" }
    ///     ],
    ///     "external": ["@lezer/lr"]
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(spec.output[1].format, ModuleFormat::Es);
    /// assert!(spec.resolve_external("@lezer/lr"));
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        let raw: RawBuildSpec =
            serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
                field: "descriptor".to_string(),
                hint: Some(e.to_string()),
            })?;
        Self::try_from(raw)
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "descriptor".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Whether `name` is kept out of the bundle.
    ///
    /// Matches the exact package root against the external set. Relative and
    /// absolute specifiers are never external.
    pub fn resolve_external(&self, name: &str) -> bool {
        match package_root(name) {
            Some(root) => self.external.contains(name) || self.external.contains(root),
            None => false,
        }
    }

    /// Entry path joined onto `root`.
    pub fn entry_path(&self, root: &Path) -> PathBuf {
        root.join(&self.entry).clean()
    }

    /// Output paths joined onto `root`, in declaration order.
    pub fn output_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.output
            .iter()
            .map(|target| root.join(&target.file).clean())
            .collect()
    }
}

/// Wire shape of a descriptor before field-level checks.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawBuildSpec {
    #[serde(default, alias = "input")]
    entry: Option<PathBuf>,

    #[serde(default)]
    output: Option<OneOrMany<RawOutput>>,

    #[serde(default)]
    external: Vec<String>,

    #[serde(default)]
    plugins: Vec<PluginRef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOutput {
    #[serde(default)]
    format: Option<String>,

    #[serde(default)]
    file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl TryFrom<RawBuildSpec> for BuildSpec {
    type Error = ConfigError;

    fn try_from(raw: RawBuildSpec) -> ConfigResult<Self> {
        let entry = raw.entry.ok_or_else(|| ConfigError::MissingField {
            field: "entry".to_string(),
        })?;
        if entry.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "entry".to_string(),
                hint: Some("entry path cannot be empty".to_string()),
            });
        }

        let raw_outputs = raw
            .output
            .ok_or_else(|| ConfigError::MissingField {
                field: "output".to_string(),
            })?
            .into_vec();

        let mut output = Vec::with_capacity(raw_outputs.len());
        for (idx, raw_output) in raw_outputs.into_iter().enumerate() {
            let format_field = format!("output[{idx}].format");
            let value = raw_output.format.ok_or_else(|| ConfigError::MissingField {
                field: format_field.clone(),
            })?;
            let format = value
                .parse::<ModuleFormat>()
                .map_err(|_| ConfigError::UnsupportedFormat {
                    field: format_field,
                    value,
                })?;

            let file = raw_output.file.ok_or_else(|| ConfigError::MissingField {
                field: format!("output[{idx}].file"),
            })?;

            output.push(OutputTarget { format, file });
        }

        Ok(BuildSpec {
            entry,
            output,
            external: raw.external.into_iter().collect(),
            plugins: raw.plugins,
        })
    }
}
