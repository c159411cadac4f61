//! Build results.

pub mod writer;

use std::path::PathBuf;

use bale_config::ModuleFormat;

/// One rendered bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub format: ModuleFormat,
    /// Absolute destination path
    pub path: PathBuf,
    pub code: String,
}

impl Artifact {
    /// Size in bytes
    pub fn size(&self) -> usize {
        self.code.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    /// In the order the descriptor lists its outputs
    pub artifacts: Vec<Artifact>,
    pub module_count: usize,
    /// Externals the graph actually references, in order of first reference
    pub externals: Vec<String>,
    /// Declared externals nothing imports
    pub unused_externals: Vec<String>,
}

impl BuildResult {
    pub fn artifact(&self, format: ModuleFormat) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.format == format)
    }

    pub fn total_size(&self) -> usize {
        self.artifacts.iter().map(Artifact::size).sum()
    }
}
