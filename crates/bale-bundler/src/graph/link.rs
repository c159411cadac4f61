//! Linking: where every import of the graph ultimately lives, the order
//! modules evaluate in, and the name each top-level binding takes once all
//! modules share one scope.
//!
//! Imports never produce bindings of their own. A reference to an import is
//! rewritten to the binding it resolves to, so reads stay live across
//! modules and through cycles.

use std::collections::BTreeMap;
use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use super::scan::{DEFAULT_LOCAL, ExportEntry, ImportBinding, Imported, Replacement};
use super::{Module, ModuleGraph, ModuleId, Target};
use crate::emit::{external_binding, namespace_binding, runtime};
use crate::{Error, Result};

/// Bindings the CommonJS wrapper provides.
const RESERVED: [&str; 7] = [
    "module",
    "exports",
    "require",
    "__filename",
    "__dirname",
    "arguments",
    "eval",
];

/// Where an imported or exported name ultimately lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// A top-level binding of a local module, by its name in that module
    Local { module: ModuleId, name: String },
    /// The namespace object of a local module
    Namespace(ModuleId),
    /// A named export of a statically loaded external
    ExternalMember { external: usize, name: String },
    ExternalDefault(usize),
    ExternalNamespace(usize),
}

/// Exported names of a module with their bindings, in export order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMembers {
    pub members: Vec<(String, Binding)>,
    /// Externals re-exported through `export *`
    pub external_stars: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Linked {
    order: Vec<ModuleId>,
    names: Vec<FxHashMap<String, String>>,
    imports: Vec<FxHashMap<String, Binding>>,
    namespaces: BTreeMap<ModuleId, NamespaceMembers>,
    entry: NamespaceMembers,
}

impl Linked {
    /// Resolve every import of `graph`, failing on names the target module
    /// does not export.
    pub fn link(graph: &ModuleGraph) -> Result<Self> {
        let count = graph.len();
        let mut imports = vec![FxHashMap::default(); count];
        let mut importers = vec![FxHashSet::default(); count];
        let mut wanted = Vec::new();

        for module in graph.modules() {
            for import in &module.scan.imports {
                let binding = resolve_import(graph, module, import, &mut Vec::new())
                    .ok_or_else(|| {
                        missing_export(module, import.request, imported_name(&import.imported))
                    })?;
                match &binding {
                    Binding::Local { module: target, .. } => {
                        importers[target.0].insert(module.id);
                    }
                    Binding::Namespace(target) => wanted.push(*target),
                    _ => {}
                }
                imports[module.id.0].insert(import.local.clone(), binding);
            }

            for entry in &module.scan.exports {
                match entry {
                    ExportEntry::Local { local, .. } => {
                        if module.scan.import(local).is_none()
                            && !module.scan.declared.contains(local)
                        {
                            return Err(Error::Parse {
                                path: module.path.clone(),
                                message: format!("exported binding '{local}' is not declared"),
                            });
                        }
                    }
                    ExportEntry::Reexport {
                        imported, request, ..
                    } => {
                        if let Target::Local(target) = module.targets[*request] {
                            if resolve_export(graph, target, imported, &mut Vec::new()).is_none() {
                                return Err(missing_export(module, *request, imported));
                            }
                        }
                    }
                    ExportEntry::Namespace { request, .. } => {
                        if let Target::Local(target) = module.targets[*request] {
                            wanted.push(target);
                        }
                    }
                }
            }

            for edit in &module.scan.edits {
                if let Replacement::DynamicImport { request } = &edit.replacement {
                    if let Target::Local(target) = module.targets[*request] {
                        wanted.push(target);
                    }
                }
            }
        }

        let entry = if graph.is_empty() {
            NamespaceMembers::default()
        } else {
            namespace_members(graph, ModuleId(0))
        };
        wanted.extend(namespace_targets(&entry));

        let mut namespaces = BTreeMap::new();
        while let Some(id) = wanted.pop() {
            if namespaces.contains_key(&id) {
                continue;
            }
            let members = namespace_members(graph, id);
            wanted.extend(namespace_targets(&members));
            namespaces.insert(id, members);
        }

        let order = evaluation_order(graph);
        let names = assign_names(graph, &order, &importers);
        debug!(
            modules = order.len(),
            namespaces = namespaces.len(),
            "linked module graph"
        );

        Ok(Self {
            order,
            names,
            imports,
            namespaces,
            entry,
        })
    }

    /// Modules in evaluation order: dependencies before their importers.
    pub fn order(&self) -> &[ModuleId] {
        &self.order
    }

    /// Bundle-wide name of a top-level binding of `module`.
    pub fn name<'s>(&'s self, module: ModuleId, local: &'s str) -> &'s str {
        self.names
            .get(module.0)
            .and_then(|names| names.get(local))
            .map_or(local, String::as_str)
    }

    pub fn import(&self, module: ModuleId, local: &str) -> Option<&Binding> {
        self.imports.get(module.0)?.get(local)
    }

    /// Modules that need a namespace object, in id order.
    pub fn namespaces(&self) -> impl Iterator<Item = (ModuleId, &NamespaceMembers)> {
        self.namespaces.iter().map(|(id, members)| (*id, members))
    }

    pub fn has_namespace(&self, id: ModuleId) -> bool {
        self.namespaces.contains_key(&id)
    }

    /// What the bundle exports.
    pub fn entry_exports(&self) -> &NamespaceMembers {
        &self.entry
    }
}

fn imported_name(imported: &Imported) -> &str {
    match imported {
        Imported::Named(name) => name,
        Imported::Default => "default",
        Imported::Namespace => "*",
    }
}

fn missing_export(module: &Module, request: usize, name: &str) -> Error {
    Error::MissingExport {
        name: name.to_string(),
        specifier: module.scan.requests[request].specifier.clone(),
        importer: module.path.clone(),
    }
}

fn external_named(external: usize, name: &str) -> Binding {
    if name == "default" {
        Binding::ExternalDefault(external)
    } else {
        Binding::ExternalMember {
            external,
            name: name.to_string(),
        }
    }
}

fn resolve_import(
    graph: &ModuleGraph,
    module: &Module,
    import: &ImportBinding,
    stack: &mut Vec<(ModuleId, String)>,
) -> Option<Binding> {
    match (module.targets[import.request], &import.imported) {
        (Target::Local(target), Imported::Namespace) => Some(Binding::Namespace(target)),
        (Target::Local(target), Imported::Default) => {
            resolve_export(graph, target, "default", stack)
        }
        (Target::Local(target), Imported::Named(name)) => {
            resolve_export(graph, target, name, stack)
        }
        (Target::External(idx), Imported::Namespace) => Some(Binding::ExternalNamespace(idx)),
        (Target::External(idx), Imported::Default) => Some(Binding::ExternalDefault(idx)),
        (Target::External(idx), Imported::Named(name)) => Some(external_named(idx, name)),
    }
}

/// Follow `name` out of module `id` until it reaches a declaration, a
/// namespace or an external. `None` when nothing exports it.
fn resolve_export(
    graph: &ModuleGraph,
    id: ModuleId,
    name: &str,
    stack: &mut Vec<(ModuleId, String)>,
) -> Option<Binding> {
    if stack.iter().any(|(seen, seen_name)| *seen == id && seen_name == name) {
        return None;
    }
    let module = graph.module(id)?;
    stack.push((id, name.to_string()));

    let found = module.scan.exports.iter().find(|entry| entry.exported() == name);
    let binding = match found {
        Some(ExportEntry::Local { local, .. }) => match module.scan.import(local) {
            Some(import) => resolve_import(graph, module, import, stack),
            None => Some(Binding::Local {
                module: id,
                name: local.clone(),
            }),
        },
        Some(ExportEntry::Reexport {
            imported, request, ..
        }) => match module.targets[*request] {
            Target::Local(target) => resolve_export(graph, target, imported, stack),
            Target::External(idx) => Some(external_named(idx, imported)),
        },
        Some(ExportEntry::Namespace { request, .. }) => Some(match module.targets[*request] {
            Target::Local(target) => Binding::Namespace(target),
            Target::External(idx) => Binding::ExternalNamespace(idx),
        }),
        // `export *` never forwards a default
        None if name == "default" => None,
        None => resolve_star(graph, module, name, stack),
    };

    stack.pop();
    binding
}

/// Local stars are searched before the first external star, whose members
/// are unknown at build time.
fn resolve_star(
    graph: &ModuleGraph,
    module: &Module,
    name: &str,
    stack: &mut Vec<(ModuleId, String)>,
) -> Option<Binding> {
    let mut external = None;
    for &request in &module.scan.stars {
        match module.targets[request] {
            Target::Local(target) => {
                if let Some(binding) = resolve_export(graph, target, name, stack) {
                    return Some(binding);
                }
            }
            Target::External(idx) => {
                external.get_or_insert(idx);
            }
        }
    }
    external.map(|idx| external_named(idx, name))
}

fn namespace_members(graph: &ModuleGraph, id: ModuleId) -> NamespaceMembers {
    let (names, external_stars) = graph.export_names(id);
    let members = names
        .into_iter()
        .filter_map(|name| {
            let binding = resolve_export(graph, id, &name, &mut Vec::new())?;
            Some((name, binding))
        })
        .collect();
    NamespaceMembers {
        members,
        external_stars,
    }
}

fn namespace_targets(members: &NamespaceMembers) -> Vec<ModuleId> {
    members
        .members
        .iter()
        .filter_map(|(_, binding)| match binding {
            Binding::Namespace(id) => Some(*id),
            _ => None,
        })
        .collect()
}

/// Depth-first post-order over static imports from the entry, so a module
/// runs after its dependencies unless a cycle says otherwise. Modules only
/// reachable through `import()` follow in id order.
fn evaluation_order(graph: &ModuleGraph) -> Vec<ModuleId> {
    let mut visited = vec![false; graph.len()];
    let mut order = Vec::with_capacity(graph.len());
    for module in graph.modules() {
        visit(graph, module.id, &mut visited, &mut order);
    }
    order
}

fn visit(graph: &ModuleGraph, id: ModuleId, visited: &mut [bool], order: &mut Vec<ModuleId>) {
    if visited[id.0] {
        return;
    }
    visited[id.0] = true;

    let module = &graph.modules()[id.0];
    for (request, target) in module.scan.requests.iter().zip(&module.targets) {
        if let (false, Target::Local(dep)) = (request.dynamic_only, target) {
            visit(graph, *dep, visited, order);
        }
    }
    order.push(id);
}

/// Every top-level binding keeps its name unless another module, a global,
/// the runtime, or a nested binding where the name would be read already
/// claims it. Collisions take the first free `name$N`.
fn assign_names(
    graph: &ModuleGraph,
    order: &[ModuleId],
    importers: &[FxHashSet<ModuleId>],
) -> Vec<FxHashMap<String, String>> {
    let mut taken: FxHashSet<String> = RESERVED
        .iter()
        .chain(runtime::HELPER_NAMES.iter())
        .map(|name| name.to_string())
        .collect();
    taken.extend((0..graph.externals().len()).map(external_binding));
    taken.extend(graph.modules().iter().map(|module| namespace_binding(module.id)));
    for module in graph.modules() {
        taken.extend(module.scan.globals.iter().cloned());
    }

    let mut names = vec![FxHashMap::default(); graph.len()];
    for &id in order {
        let module = &graph.modules()[id.0];
        let shadowing: FxHashSet<&str> = importers[id.0]
            .iter()
            .flat_map(|importer| graph.modules()[importer.0].scan.nested.iter())
            .map(String::as_str)
            .collect();

        for local in &module.scan.declared {
            let base = if local == DEFAULT_LOCAL {
                default_name(&module.path)
            } else {
                local.clone()
            };
            let mut candidate = base.clone();
            let mut suffix = 1;
            while taken.contains(&candidate)
                || shadowing.contains(candidate.as_str())
                || (candidate != *local && module.scan.nested.contains(&candidate))
            {
                candidate = format!("{base}${suffix}");
                suffix += 1;
            }
            if candidate != *local {
                debug!(module = %module.display_path, from = %local, to = %candidate, "renamed binding");
            }
            taken.insert(candidate.clone());
            names[id.0].insert(local.clone(), candidate);
        }
    }
    names
}

/// `tokens.js` -> `tokens_default`
fn default_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    let mut name: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name.push_str("_default");
    name
}
