//! Error types for descriptor loading and validation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Filesystem validation errors
    #[error("entry path not found: {}", path.display())]
    EntryNotFound { path: PathBuf },

    #[error("entry path is not a readable file: {}", path.display())]
    EntryNotReadable { path: PathBuf },

    #[error("output path for '{field}' is not writable: {}", path.display())]
    OutputNotWritable { field: String, path: PathBuf },

    // Descriptor parsing/loading errors
    #[error("no build descriptor found in {}", root.display())]
    NotFound { root: PathBuf },

    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("invalid value for '{field}'{}", hint.as_ref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue { field: String, hint: Option<String> },

    #[error("unsupported module format '{value}' for '{field}' (expected 'cjs' or 'es')")]
    UnsupportedFormat { field: String, value: String },

    #[error("unknown plugin '{name}' in '{field}'")]
    UnknownPlugin { field: String, name: String },

    // Schema validation errors (no filesystem checks)
    #[error("no output targets specified")]
    NoOutputs,

    #[error("output path '{}' in '{field}' is already used by another output", path.display())]
    DuplicateOutput { field: String, path: PathBuf },

    #[error("schema validation failed for '{field}': {message}")]
    SchemaValidation { field: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// The descriptor field this error is about, when it names one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::EntryNotFound { .. } | ConfigError::EntryNotReadable { .. } => {
                Some("entry")
            }
            ConfigError::NoOutputs => Some("output"),
            ConfigError::OutputNotWritable { field, .. }
            | ConfigError::MissingField { field }
            | ConfigError::InvalidValue { field, .. }
            | ConfigError::UnsupportedFormat { field, .. }
            | ConfigError::UnknownPlugin { field, .. }
            | ConfigError::DuplicateOutput { field, .. }
            | ConfigError::SchemaValidation { field, .. } => Some(field),
            ConfigError::NotFound { .. } | ConfigError::Io(_) => None,
        }
    }
}
