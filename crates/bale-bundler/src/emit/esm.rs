//! ES module wrapper: namespace imports for externals, one export list for
//! the entry's own bindings and `export ... from` for what it forwards from
//! externals.

use super::{external_binding, js_string, namespace_binding, property_key};
use crate::graph::{Binding, Linked, ModuleGraph};

pub(super) fn header(out: &mut String, graph: &ModuleGraph) {
    let mut any = false;
    for (idx, external) in graph.externals().iter().enumerate() {
        if external.is_static {
            out.push_str(&format!(
                "import * as {} from {};\n",
                external_binding(idx),
                js_string(&external.specifier)
            ));
            any = true;
        }
    }
    if any {
        out.push('\n');
    }
}

pub(super) fn footer(graph: &ModuleGraph, linked: &Linked) -> String {
    let exports = linked.entry_exports();
    let mut locals = Vec::new();
    // (external, specifiers) in order of first use
    let mut forwarded: Vec<(usize, Vec<String>)> = Vec::new();
    let mut namespaces = Vec::new();

    for (name, binding) in &exports.members {
        match binding {
            Binding::Local { module, name: local } => {
                locals.push(specifier(linked.name(*module, local), name));
            }
            Binding::Namespace(id) => locals.push(specifier(&namespace_binding(*id), name)),
            Binding::ExternalMember { external, name: imported } => {
                forward(&mut forwarded, *external, specifier(imported, name));
            }
            Binding::ExternalDefault(external) => {
                forward(&mut forwarded, *external, specifier("default", name));
            }
            Binding::ExternalNamespace(external) => namespaces.push(format!(
                "export * as {} from {};\n",
                property_key(name),
                js_string(&graph.externals()[*external].specifier)
            )),
        }
    }

    let mut out = String::new();
    if !locals.is_empty() {
        out.push_str(&format!("export {{ {} }};\n", locals.join(", ")));
    }
    for (external, specifiers) in forwarded {
        out.push_str(&format!(
            "export {{ {} }} from {};\n",
            specifiers.join(", "),
            js_string(&graph.externals()[external].specifier)
        ));
    }
    for line in namespaces {
        out.push_str(&line);
    }
    for idx in &exports.external_stars {
        out.push_str(&format!(
            "export * from {};\n",
            js_string(&graph.externals()[*idx].specifier)
        ));
    }
    out
}

fn specifier(local: &str, exported: &str) -> String {
    if local == exported {
        property_key(local)
    } else {
        format!("{} as {}", property_key(local), property_key(exported))
    }
}

fn forward(forwarded: &mut Vec<(usize, Vec<String>)>, external: usize, specifier: String) {
    match forwarded.iter_mut().find(|(idx, _)| *idx == external) {
        Some((_, specifiers)) => specifiers.push(specifier),
        None => forwarded.push((external, vec![specifier])),
    }
}
