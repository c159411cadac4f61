//! Atomic artifact writing.
//!
//! All artifacts of a build are committed together:
//!
//! 1. Every artifact is written to a temporary sibling (`<file>.bale-tmp`)
//! 2. Once all temporary files exist, each is renamed over its destination
//! 3. If any step fails, every temporary file is removed
//!
//! Destination parent directories are created as needed and removed again
//! when a write fails before anything was renamed into them.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use tracing::warn;

use super::Artifact;
use crate::{Error, Result};

const TEMP_SUFFIX: &str = ".bale-tmp";

/// Write `artifacts` atomically, refusing to overwrite any of `sources`.
pub fn write_artifacts(artifacts: &[Artifact], sources: &[PathBuf]) -> Result<()> {
    let mut operations = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let target = validate_output_path(&artifact.path, sources)?;
        operations.push((target, artifact.code.as_bytes()));
    }
    write_files_atomic(&operations)
}

fn validate_output_path(path: &Path, sources: &[PathBuf]) -> Result<PathBuf> {
    if path.as_os_str().to_string_lossy().contains('\0') {
        return Err(Error::InvalidOutputPath(
            "Filename contains null byte".to_string(),
        ));
    }

    let cleaned = path.clean();
    if sources.iter().any(|source| source.clean() == cleaned) {
        return Err(Error::InvalidOutputPath(format!(
            "'{}' would overwrite a bundled source module",
            cleaned.display()
        )));
    }

    Ok(cleaned)
}

fn temp_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// Writes multiple files atomically with automatic rollback on failure.
fn write_files_atomic(operations: &[(PathBuf, &[u8])]) -> Result<()> {
    let mut staged = Staged::default();

    // Phase 1: Write to temporary files
    for (target_path, content) in operations {
        staged.create_parent(target_path).map_err(|(parent, e)| {
            staged.rollback();
            Error::WriteFailure(format!(
                "Failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;

        let temp = temp_path(target_path);
        // Recorded first so a partial write is rolled back too
        staged.temps.push((temp.clone(), target_path.clone()));
        fs::write(&temp, content).map_err(|e| {
            staged.rollback();
            Error::WriteFailure(format!(
                "Failed to write temporary file '{}': {}",
                temp.display(),
                e
            ))
        })?;
    }

    // Phase 2: Rename temp files to final names
    for (temp, target_path) in &staged.temps {
        fs::rename(temp, target_path).map_err(|e| {
            // Renamed outputs live in the created directories now; keep them
            staged.remove_temps();
            Error::WriteFailure(format!(
                "Failed to rename '{}' to '{}': {}",
                temp.display(),
                target_path.display(),
                e
            ))
        })?;
    }

    Ok(())
}

/// What phase 1 has put on disk so far.
#[derive(Debug, Default)]
struct Staged {
    /// `(temp, target)` pairs
    temps: Vec<(PathBuf, PathBuf)>,
    /// Topmost directory of each chain `create_dir_all` had to create
    created_dirs: Vec<PathBuf>,
}

impl Staged {
    fn create_parent(&mut self, target: &Path) -> std::result::Result<(), (PathBuf, io::Error)> {
        let Some(parent) = target.parent() else {
            return Ok(());
        };
        let mut topmost = None;
        let mut dir = parent;
        while !dir.as_os_str().is_empty() && !dir.exists() {
            topmost = Some(dir.to_path_buf());
            match dir.parent() {
                Some(up) => dir = up,
                None => break,
            }
        }

        fs::create_dir_all(parent).map_err(|e| (parent.to_path_buf(), e))?;
        if let Some(created) = topmost {
            self.created_dirs.push(created);
        }
        Ok(())
    }

    /// Best-effort removal of temporary files; we are already failing.
    fn remove_temps(&self) {
        for (temp, _) in &self.temps {
            if temp.exists() {
                if let Err(e) = fs::remove_file(temp) {
                    warn!(path = %temp.display(), error = %e, "failed to clean up temporary file");
                }
            }
        }
    }

    fn rollback(&self) {
        self.remove_temps();
        for dir in self.created_dirs.iter().rev() {
            if dir.exists() {
                if let Err(e) = fs::remove_dir_all(dir) {
                    warn!(path = %dir.display(), error = %e, "failed to remove created directory");
                }
            }
        }
    }
}
