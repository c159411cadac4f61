//! Platform runtime abstraction
//!
//! The bundler reads sources through the `Runtime` trait so callers can
//! swap the filesystem (in-memory fixtures, virtual files) without touching
//! graph construction.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(String),
}

#[async_trait]
pub trait Runtime: Send + Sync + std::fmt::Debug {
    /// Read a file from the filesystem
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>>;

    /// Whether `path` exists and is a regular file
    fn is_file(&self, path: &Path) -> bool;
}

/// Runtime backed by the local filesystem via tokio
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRuntime;

#[async_trait]
impl Runtime for NativeRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RuntimeError::FileNotFound(path.to_path_buf())
            } else {
                RuntimeError::Io(format!("Failed to read {}: {}", path.display(), e))
            }
        })
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}
