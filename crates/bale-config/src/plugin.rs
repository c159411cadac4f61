use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference to a resolver plugin, by name, with plugin-specific options.
///
/// Accepts either a bare name (`"node-resolve"`) or a table
/// (`{ name = "node-resolve", options = { extensions = [".js"] } }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PluginRefRepr")]
pub struct PluginRef {
    pub name: String,

    /// Forwarded to the plugin when it is instantiated
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,
}

impl PluginRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Value::Null,
        }
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PluginRefRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        options: Value,
    },
}

impl From<PluginRefRepr> for PluginRef {
    fn from(repr: PluginRefRepr) -> Self {
        match repr {
            PluginRefRepr::Name(name) => PluginRef::new(name),
            PluginRefRepr::Full { name, options } => PluginRef { name, options },
        }
    }
}
