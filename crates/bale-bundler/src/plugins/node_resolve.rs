//! `node-resolve`: bare specifiers through `node_modules` package layouts.

use std::path::{Path, PathBuf};

use oxc_resolver::{ResolveOptions, Resolver};
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use super::ResolverPlugin;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct NodeResolveOptions {
    /// Extensions tried when a specifier has none
    pub extensions: Vec<String>,

    /// `package.json` fields consulted for a package's entry point
    #[serde(alias = "main_fields")]
    pub main_fields: Vec<String>,

    /// Conditions matched against a package's `exports` map
    #[serde(alias = "export_conditions")]
    pub export_conditions: Vec<String>,
}

impl Default for NodeResolveOptions {
    fn default() -> Self {
        Self {
            extensions: vec![".mjs".into(), ".js".into()],
            main_fields: vec!["module".into(), "main".into()],
            export_conditions: vec!["default".into(), "module".into(), "import".into()],
        }
    }
}

impl NodeResolveOptions {
    /// Parse plugin options; `null` selects the defaults.
    pub fn from_value(value: &Value) -> serde_json::Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Self::deserialize(value)
    }
}

pub struct NodeResolve {
    resolver: Resolver,
    options: NodeResolveOptions,
}

impl NodeResolve {
    pub fn new(options: NodeResolveOptions) -> Self {
        let resolver = Resolver::new(ResolveOptions {
            extensions: options.extensions.clone(),
            main_fields: options.main_fields.clone(),
            condition_names: options.export_conditions.clone(),
            ..Default::default()
        });
        Self { resolver, options }
    }

    pub fn options(&self) -> &NodeResolveOptions {
        &self.options
    }
}

impl std::fmt::Debug for NodeResolve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeResolve")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ResolverPlugin for NodeResolve {
    fn name(&self) -> &str {
        "node-resolve"
    }

    fn resolve_id(&self, specifier: &str, importer: &Path) -> Result<Option<PathBuf>> {
        let from_dir = importer.parent().unwrap_or(importer);
        match self.resolver.resolve(from_dir, specifier) {
            Ok(resolution) => Ok(Some(resolution.path().to_path_buf())),
            Err(err) => {
                trace!(specifier, error = %err, "node-resolve miss");
                Ok(None)
            }
        }
    }
}
