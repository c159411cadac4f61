//! The `apply()` side of a [`BuildSpec`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bale_config::{BuildSpec, ConfigValidator, FsValidator, ModuleFormat, package_root};
use path_clean::PathClean;
use tracing::{debug, info};

use crate::emit;
use crate::graph::{Linked, ModuleGraph};
use crate::output::{Artifact, BuildResult, writer};
use crate::plugins::PluginRegistry;
use crate::resolve::ModuleResolver;
use crate::runtime::{NativeRuntime, Runtime};
use crate::{Error, Result};

/// Builds one descriptor.
///
/// ```no_run
/// use bale_bundler::{BuildSpec, Bundler, ModuleFormat};
///
/// # async fn run() -> bale_bundler::Result<()> {
/// let spec = BuildSpec::new("src/parser.js").output(ModuleFormat::Es, "dist/index.js");
/// let result = Bundler::new(spec).cwd("/path/to/project").build().await?;
/// assert_eq!(result.artifacts.len(), 1);
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct Bundler {
    spec: BuildSpec,
    cwd: Option<PathBuf>,
    runtime: Arc<dyn Runtime>,
    plugins: Option<PluginRegistry>,
}

impl Bundler {
    pub fn new(spec: BuildSpec) -> Self {
        Self {
            spec,
            cwd: None,
            runtime: Arc::new(NativeRuntime),
            plugins: None,
        }
    }

    /// Directory that relative descriptor paths are resolved against.
    /// Defaults to the process working directory.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn runtime(mut self, runtime: Arc<dyn Runtime>) -> Self {
        self.runtime = runtime;
        self
    }

    /// Use `plugins` instead of instantiating the descriptor's plugin list.
    pub fn plugins(mut self, plugins: PluginRegistry) -> Self {
        self.plugins = Some(plugins);
        self
    }

    pub fn spec(&self) -> &BuildSpec {
        &self.spec
    }

    /// Validate, bundle and render every output without touching the disk.
    pub async fn generate(&self) -> Result<BuildResult> {
        self.bundle().await.map(|(result, _)| result)
    }

    async fn bundle(&self) -> Result<(BuildResult, ModuleGraph)> {
        let root = self.root()?;
        FsValidator::new(&root).validate(&self.spec)?;

        let owned_plugins;
        let plugins = match &self.plugins {
            Some(plugins) => plugins,
            None => {
                owned_plugins = PluginRegistry::from_refs(&self.spec.plugins)?;
                &owned_plugins
            }
        };

        let resolver = ModuleResolver::new(&self.spec, plugins, self.runtime.as_ref());
        let entry = self.spec.entry_path(&root);
        let graph = ModuleGraph::build(&entry, &root, &resolver, self.runtime.as_ref()).await?;
        debug!(modules = graph.len(), externals = graph.externals().len(), "module graph built");

        let linked = Linked::link(&graph)?;
        self.check_formats(&graph)?;

        let mut unused_externals = Vec::new();
        for name in &self.spec.external {
            let referenced = graph.externals().iter().any(|ext| {
                ext.specifier == *name || package_root(&ext.specifier) == Some(name.as_str())
            });
            if !referenced {
                debug!(external = %name, "external is never imported");
                unused_externals.push(name.clone());
            }
        }

        let artifacts = self
            .spec
            .output
            .iter()
            .zip(self.spec.output_paths(&root))
            .map(|(target, path)| Artifact {
                format: target.format,
                path,
                code: emit::render(&graph, &linked, target.format),
            })
            .collect();

        let result = BuildResult {
            artifacts,
            module_count: graph.len(),
            externals: graph
                .externals()
                .iter()
                .map(|ext| ext.specifier.clone())
                .collect(),
            unused_externals,
        };
        Ok((result, graph))
    }

    /// CommonJS output is synchronous, so no bundled module may await at
    /// its top level.
    fn check_formats(&self, graph: &ModuleGraph) -> Result<()> {
        if !self.spec.output.iter().any(|t| t.format == ModuleFormat::Cjs) {
            return Ok(());
        }
        match graph.modules().iter().find(|m| m.scan.top_level_await) {
            Some(module) => Err(Error::Parse {
                path: module.path.clone(),
                message: "top-level await cannot be emitted as CommonJS; build this entry as `es` only"
                    .to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Validate, bundle and write every output.
    ///
    /// Nothing is written unless every artifact renders; the writes
    /// themselves are committed together.
    pub async fn build(&self) -> Result<BuildResult> {
        let (result, graph) = self.bundle().await?;

        let sources: Vec<PathBuf> = graph.modules().iter().map(|m| m.path.clone()).collect();
        writer::write_artifacts(&result.artifacts, &sources)?;

        for artifact in &result.artifacts {
            info!(
                path = %artifact.path.display(),
                format = %artifact.format,
                bytes = artifact.size(),
                "wrote artifact"
            );
        }
        Ok(result)
    }

    /// Absolute build root; symlinks resolved so plugin results share its prefix.
    fn root(&self) -> Result<PathBuf> {
        let root = match &self.cwd {
            Some(cwd) if cwd.is_absolute() => cwd.clean(),
            Some(cwd) => std::env::current_dir().map_err(Error::Io)?.join(cwd).clean(),
            None => std::env::current_dir().map_err(Error::Io)?,
        };
        Ok(root.canonicalize().unwrap_or(root))
    }
}

/// Apply `spec` relative to `cwd`: bundle the entry and write every output.
pub async fn apply(spec: &BuildSpec, cwd: impl AsRef<Path>) -> Result<BuildResult> {
    Bundler::new(spec.clone()).cwd(cwd.as_ref()).build().await
}
