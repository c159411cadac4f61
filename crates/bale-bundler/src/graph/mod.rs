//! Module graph reachable from the entry.
//!
//! Traversal is breadth-first in request order, so module ids, external
//! order and therefore the emitted bundle depend only on the input files.

pub mod link;
pub mod scan;

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::resolve::{ModuleResolver, Resolved};
use crate::runtime::Runtime;
use crate::{Error, Result};

pub use link::{Binding, Linked, NamespaceMembers};
pub use scan::{
    ExportEntry, ImportBinding, Imported, ModuleScan, Replacement, Request, SymbolRef,
    scan_module,
};

/// Index of a module in the graph; the entry is always `ModuleId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub usize);

/// What a module request points to after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Local(ModuleId),
    /// Index into [`ModuleGraph::externals`]
    External(usize),
}

#[derive(Debug, Clone)]
pub struct Module {
    pub id: ModuleId,
    pub path: PathBuf,
    /// Path relative to the build root, `/`-separated
    pub display_path: String,
    pub source: String,
    pub scan: ModuleScan,
    /// Resolved target of each entry in `scan.requests`
    pub targets: Vec<Target>,
}

/// An external package referenced from the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalRef {
    /// Specifier as written in the importing module
    pub specifier: String,
    /// Referenced by at least one static import or re-export
    pub is_static: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    modules: Vec<Module>,
    externals: Vec<ExternalRef>,
}

impl ModuleGraph {
    /// Walk the graph from `entry`, reading every local module.
    pub async fn build(
        entry: &Path,
        root: &Path,
        resolver: &ModuleResolver<'_>,
        runtime: &dyn Runtime,
    ) -> Result<Self> {
        let mut graph = ModuleGraph::default();
        let mut ids: FxHashMap<PathBuf, ModuleId> = FxHashMap::default();
        let mut externals: FxHashMap<String, usize> = FxHashMap::default();
        let mut pending: VecDeque<(ModuleId, PathBuf)> = VecDeque::new();

        ids.insert(entry.to_path_buf(), ModuleId(0));
        pending.push_back((ModuleId(0), entry.to_path_buf()));

        while let Some((id, path)) = pending.pop_front() {
            let bytes = runtime
                .read_file(&path)
                .await
                .map_err(|source| Error::Read {
                    path: path.clone(),
                    source,
                })?;
            let source = String::from_utf8(bytes).map_err(|_| Error::Parse {
                path: path.clone(),
                message: "file is not valid UTF-8".to_string(),
            })?;
            let scan = scan_module(&path, &source)?;

            let mut targets = Vec::with_capacity(scan.requests.len());
            for request in &scan.requests {
                let target = match resolver.resolve(&request.specifier, &path)? {
                    Resolved::Local(dep) => {
                        let next = ModuleId(ids.len());
                        let dep_id = *ids.entry(dep.clone()).or_insert_with(|| {
                            pending.push_back((next, dep.clone()));
                            next
                        });
                        Target::Local(dep_id)
                    }
                    Resolved::External(specifier) => {
                        let idx = match externals.get(&specifier) {
                            Some(idx) => *idx,
                            None => {
                                let idx = graph.externals.len();
                                externals.insert(specifier.clone(), idx);
                                graph.externals.push(ExternalRef {
                                    specifier,
                                    is_static: false,
                                });
                                idx
                            }
                        };
                        graph.externals[idx].is_static |= !request.dynamic_only;
                        Target::External(idx)
                    }
                };
                debug!(
                    importer = %path.display(),
                    specifier = %request.specifier,
                    ?target,
                    "resolved import"
                );
                targets.push(target);
            }

            graph.modules.push(Module {
                id,
                display_path: display_path(&path, root),
                path,
                source,
                scan,
                targets,
            });
        }

        Ok(graph)
    }

    pub fn entry(&self) -> Option<&Module> {
        self.modules.first()
    }

    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(id.0)
    }

    /// Modules in id order
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Externals in order of first reference
    pub fn externals(&self) -> &[ExternalRef] {
        &self.externals
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Names `id` exports, including names reached through `export *` of
    /// local modules, plus the externals it re-exports wholesale.
    pub fn export_names(&self, id: ModuleId) -> (Vec<String>, Vec<usize>) {
        let mut names = Vec::new();
        let mut external_stars = Vec::new();
        let mut visited = vec![false; self.modules.len()];
        if id.0 < self.modules.len() {
            self.collect_exports(id, true, &mut visited, &mut names, &mut external_stars);
        }
        (names, external_stars)
    }

    fn collect_exports(
        &self,
        id: ModuleId,
        is_root: bool,
        visited: &mut [bool],
        names: &mut Vec<String>,
        external_stars: &mut Vec<usize>,
    ) {
        if visited[id.0] {
            return;
        }
        visited[id.0] = true;

        let Some(module) = self.module(id) else {
            return;
        };
        for entry in &module.scan.exports {
            let name = entry.exported();
            // `export *` never forwards a default
            if (is_root || name != "default") && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        for &request in &module.scan.stars {
            match module.targets[request] {
                Target::Local(dep) => {
                    self.collect_exports(dep, false, visited, names, external_stars)
                }
                Target::External(idx) => {
                    if !external_stars.contains(&idx) {
                        external_stars.push(idx);
                    }
                }
            }
        }
    }
}

/// `path` relative to `root`, `/`-separated; modules outside the root get
/// `..` segments.
fn display_path(path: &Path, root: &Path) -> String {
    let relative = pathdiff::diff_paths(path, root)
        .unwrap_or_else(|| PathBuf::from(path.file_name().unwrap_or_default()));
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
