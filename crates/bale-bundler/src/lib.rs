//! # bale-bundler
//!
//! Applies a [`BuildSpec`]: resolves the module graph reachable from the
//! entry, keeps declared externals out of it, links every import to the
//! binding it names, and emits one scope-hoisted bundle per output target
//! in CommonJS or ES module format.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bale_bundler::{BuildSpec, Bundler, ModuleFormat};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let spec = BuildSpec::new("./src/parser.js")
//!     .output(ModuleFormat::Cjs, "./dist/index.cjs")
//!     .output(ModuleFormat::Es, "./dist/index.js")
//!     .external(["@lezer/lr", "@lezer/common", "@lezer/highlight"]);
//!
//! let result = Bundler::new(spec).cwd(".").build().await?;
//! for artifact in &result.artifacts {
//!     println!("{} ({} bytes)", artifact.path.display(), artifact.size());
//! }
//! # Ok(()) }
//! ```

pub mod builder;
pub mod emit;
pub mod graph;
pub mod output;
pub mod plugins;
pub mod resolve;
pub mod runtime;

pub use bale_config::{BuildSpec, ConfigError, ModuleFormat, OutputTarget, PluginRef};

pub use builder::{Bundler, apply};
pub use graph::{ExternalRef, Linked, Module, ModuleGraph, ModuleId};
pub use output::{Artifact, BuildResult};
pub use plugins::{NodeResolve, NodeResolveOptions, PluginRegistry, ResolverPlugin};
pub use resolve::{ModuleResolver, Resolved};
pub use runtime::{NativeRuntime, Runtime, RuntimeError, RuntimeResult};

use std::path::PathBuf;

/// Error types for bale-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The descriptor failed validation.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// An import specifier matched neither a file, an external nor a plugin.
    #[error("Could not resolve '{specifier}' from {}", importer.display())]
    Resolution { specifier: String, importer: PathBuf },

    /// A module is not valid JavaScript.
    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// An import or re-export names something its target does not export.
    #[error("'{name}' is not exported by '{specifier}' (imported from {})", importer.display())]
    MissingExport {
        name: String,
        specifier: String,
        importer: PathBuf,
    },

    /// A module could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    /// A resolver plugin failed.
    #[error("Plugin '{plugin}' failed: {message}")]
    Plugin { plugin: String, message: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid output path (e.g. null byte, output overwriting a source module).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),
}

/// Result type alias for bale-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Config(_) => "CONFIG_ERROR",
            Error::Resolution { .. } => "RESOLUTION_ERROR",
            Error::Parse { .. } => "PARSE_ERROR",
            Error::MissingExport { .. } => "MISSING_EXPORT",
            Error::Read { .. } => "READ_ERROR",
            Error::Plugin { .. } => "PLUGIN_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::InvalidOutputPath(_) => "INVALID_OUTPUT_PATH",
            Error::WriteFailure(_) => "WRITE_FAILURE",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::Config(err) => err.field().map(|field| {
                Box::new(format!("Check the '{field}' field of your descriptor."))
                    as Box<dyn std::fmt::Display>
            }),
            Error::Resolution { specifier, .. } => Some(Box::new(format!(
                "Add '{}' to `external` to keep it out of the bundle, or enable the `node-resolve` plugin to bundle it from node_modules.",
                bale_config::package_root(specifier).unwrap_or(specifier)
            ))),
            Error::Parse { .. } => Some(Box::new(
                "Only JavaScript ES modules are bundled. TypeScript and JSX must be compiled first.",
            )),
            Error::MissingExport { name, .. } => Some(Box::new(format!(
                "Check the spelling of '{name}', or export it from the imported module."
            ))),
            Error::InvalidOutputPath(path) => Some(Box::new(format!(
                "The output path '{path}' is invalid. Pick a destination that is not a source module."
            ))),
            Error::WriteFailure(msg) => Some(Box::new(format!(
                "Failed to write file. Check disk space and permissions.\nError: {msg}"
            ))),
            _ => None,
        }
    }
}
