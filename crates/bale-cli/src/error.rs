//! Error handling for the bale CLI.
//!
//! Commands return [`CliError`]. Library errors convert automatically via
//! `#[from]`, and `main` turns the final error into a miette report with
//! [`cli_error_to_miette`].
//!
//! # Example
//!
//! ```rust,no_run
//! use bale_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_descriptor(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).with_path(path)
//! }
//! ```

mod report;

use std::path::PathBuf;
use thiserror::Error;

pub use report::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The descriptor could not be found, parsed or validated
    #[error("Configuration error: {0}")]
    Config(#[from] bale_config::ConfigError),

    /// Resolution, parsing or writing failed during the build
    #[error("Build error: {0}")]
    Build(#[from] bale_bundler::Error),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Report a `NotFound` I/O error as [`CliError::FileNotFound`] for `path`.
    ///
    /// ```rust,no_run
    /// # use std::path::Path;
    /// # use bale_cli::error::{Result, ResultExt};
    /// # fn run() -> Result<()> {
    /// let path = Path::new("bale.toml");
    /// std::fs::read_to_string(path).with_path(path)?;
    /// # Ok(())
    /// # }
    /// ```
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bale_config::ConfigError;

    #[test]
    fn config_errors_convert_and_keep_their_message() {
        let err: CliError = ConfigError::UnsupportedFormat {
            field: "output[1].format".to_string(),
            value: "umd".to_string(),
        }
        .into();

        assert!(matches!(err, CliError::Config(_)));
        let msg = err.to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("umd"));
        assert!(msg.contains("output[1].format"));
    }

    #[test]
    fn bundler_errors_convert() {
        let err: CliError = bale_bundler::Error::Resolution {
            specifier: "@lezer/markdown".to_string(),
            importer: PathBuf::from("src/parser.js"),
        }
        .into();

        assert!(matches!(err, CliError::Build(_)));
        assert!(err.to_string().contains("@lezer/markdown"));
    }

    #[test]
    fn with_path_maps_not_found() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));

        let err = result.with_path("/project/bale.toml").unwrap_err();
        match err {
            CliError::FileNotFound(path) => assert_eq!(path, PathBuf::from("/project/bale.toml")),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn with_path_keeps_other_io_errors() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));

        let err = result.with_path("/project/bale.toml").unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
