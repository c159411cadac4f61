//! Shared utilities for command implementations.

use std::path::{Path, PathBuf};

use bale_config::{BuildSpec, ConfigDiscovery, load_from_path};
use tracing::debug;

use crate::cli::ProjectArgs;
use crate::error::{CliError, Result, ResultExt};

/// Resolve a path relative to a working directory.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// The project directory: `--cwd` (relative to the process directory) or
/// the process directory itself.
pub fn resolve_cwd(cwd: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir()?;
    let root = match cwd {
        Some(dir) => resolve_path(dir, &current),
        None => current,
    };

    if !root.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "Project directory does not exist: {}",
            root.display()
        )));
    }
    Ok(root)
}

/// Load the descriptor named by `--config`, or discover one in `cwd`.
///
/// Returns the descriptor together with the file it came from.
pub fn load_spec(project: &ProjectArgs, cwd: &Path) -> Result<(BuildSpec, PathBuf)> {
    match &project.config {
        Some(config) => {
            let path = resolve_path(config, cwd);
            std::fs::metadata(&path).with_path(&path)?;
            debug!(path = %path.display(), "using explicit descriptor");
            Ok((load_from_path(&path)?, path))
        }
        None => {
            let discovery = ConfigDiscovery::new(cwd);
            let path = discovery.find().ok_or_else(|| bale_config::ConfigError::NotFound {
                root: cwd.to_path_buf(),
            })?;
            Ok((load_from_path(&path)?, path))
        }
    }
}

/// `path` relative to `cwd` for display, or unchanged if outside it.
pub fn display_relative(path: &Path, cwd: &Path) -> String {
    path.strip_prefix(cwd)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
