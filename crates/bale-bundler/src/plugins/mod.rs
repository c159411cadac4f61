//! Resolver plugins.
//!
//! Plugins are consulted, in declaration order, for bare specifiers that are
//! neither relative paths nor declared externals. The first plugin to return
//! a path wins.

pub mod node_resolve;

use std::path::{Path, PathBuf};

use bale_config::{ConfigError, PluginRef};
use tracing::debug;

use crate::Result;

pub use node_resolve::{NodeResolve, NodeResolveOptions};

/// A resolution extension.
pub trait ResolverPlugin: Send + Sync + std::fmt::Debug {
    /// Plugin name, used in diagnostics.
    fn name(&self) -> &str;

    /// Resolve `specifier` as imported from the file `importer`.
    ///
    /// `Ok(None)` passes the specifier on to the next plugin.
    fn resolve_id(&self, specifier: &str, importer: &Path) -> Result<Option<PathBuf>>;
}

/// Ordered set of resolver plugins
#[derive(Debug, Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn ResolverPlugin>>,
}

impl PluginRegistry {
    /// Create a new empty plugin registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate the built-in plugins a descriptor names.
    pub fn from_refs(refs: &[PluginRef]) -> Result<Self> {
        let mut registry = Self::new();
        for (idx, plugin_ref) in refs.iter().enumerate() {
            match plugin_ref.name.as_str() {
                "node-resolve" | "node" | "nodeResolve" => {
                    let options = NodeResolveOptions::from_value(&plugin_ref.options)
                        .map_err(|e| ConfigError::InvalidValue {
                            field: format!("plugins[{idx}].options"),
                            hint: Some(e.to_string()),
                        })?;
                    registry.register(NodeResolve::new(options));
                }
                other => {
                    return Err(ConfigError::UnknownPlugin {
                        field: format!("plugins[{idx}].name"),
                        name: other.to_string(),
                    }
                    .into());
                }
            }
        }
        Ok(registry)
    }

    /// Append a plugin; it is consulted after every plugin already registered.
    pub fn register(&mut self, plugin: impl ResolverPlugin + 'static) {
        self.plugins.push(Box::new(plugin));
    }

    /// Ask each plugin in order; the first hit wins.
    pub fn resolve_id(&self, specifier: &str, importer: &Path) -> Result<Option<PathBuf>> {
        for plugin in &self.plugins {
            if let Some(path) = plugin.resolve_id(specifier, importer)? {
                debug!(plugin = plugin.name(), specifier, path = %path.display(), "plugin resolved");
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    /// Get the number of plugins in the registry
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
