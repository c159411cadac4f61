//! Bundle emission.
//!
//! Local modules are concatenated into one scope in evaluation order. Each
//! top-level binding carries its linked name and each import reference is
//! replaced by the binding it resolves to. The format only decides how
//! externals are loaded and how the entry's exports leave the bundle.

mod cjs;
mod esm;
pub mod runtime;

use bale_config::ModuleFormat;

use crate::graph::scan::DEFAULT_LOCAL;
use crate::graph::{
    Binding, Linked, Module, ModuleGraph, ModuleId, NamespaceMembers, Replacement, SymbolRef,
    Target,
};
use runtime::{INTEROP, NAMESPACE};

/// Render the linked graph as one bundle.
pub fn render(graph: &ModuleGraph, linked: &Linked, format: ModuleFormat) -> String {
    let mut body = String::new();
    let mut any_namespace = false;
    for (id, members) in linked.namespaces() {
        body.push_str(&namespace_object(linked, id, members, format));
        any_namespace = true;
    }
    if any_namespace {
        body.push('\n');
    }
    for &id in linked.order() {
        if let Some(module) = graph.module(id) {
            render_module(&mut body, graph, linked, module, format);
        }
    }

    let footer = match format {
        ModuleFormat::Cjs => cjs::footer(linked),
        ModuleFormat::Es => esm::footer(graph, linked),
    };

    let mut out = String::new();
    match format {
        ModuleFormat::Cjs => cjs::header(&mut out, graph),
        ModuleFormat::Es => esm::header(&mut out, graph),
    }
    runtime::push_helpers(&mut out, &[&body, &footer]);
    out.push_str(&body);
    out.push_str(&footer);
    out
}

/// Binding name of a statically imported external.
pub(crate) fn external_binding(idx: usize) -> String {
    format!("__bale_ext_{idx}")
}

/// Binding name of a local module's namespace object.
pub(crate) fn namespace_binding(id: ModuleId) -> String {
    format!("__bale_ns_{}", id.0)
}

fn render_module(
    out: &mut String,
    graph: &ModuleGraph,
    linked: &Linked,
    module: &Module,
    format: ModuleFormat,
) {
    out.push_str(&format!("// {}\n", module.display_path));
    let body = module.scan.rewrite(&module.source, |replacement| match replacement {
        Replacement::Text(text) => text.clone(),
        Replacement::DefaultConst => format!("const {} = ", linked.name(module.id, DEFAULT_LOCAL)),
        Replacement::DefaultName => format!(" {}", linked.name(module.id, DEFAULT_LOCAL)),
        Replacement::Symbol(symbol) => symbol_text(linked, module, symbol, format),
        Replacement::DynamicImport { request } => {
            dynamic_import(graph, module.targets[*request], format)
        }
    });
    out.push_str(body.trim_start_matches('\n'));
    if !body.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
}

fn symbol_text(linked: &Linked, module: &Module, symbol: &SymbolRef, format: ModuleFormat) -> String {
    let (text, is_member) = match linked.import(module.id, &symbol.name) {
        Some(binding) => binding_expr(linked, binding, format),
        None => (linked.name(module.id, &symbol.name).to_string(), false),
    };
    // A member callee would otherwise be called with the external as `this`
    let text = if symbol.callee && is_member {
        format!("(0, {text})")
    } else {
        text
    };
    if symbol.shorthand && text != symbol.name {
        format!("{}: {text}", symbol.name)
    } else {
        text
    }
}

/// Expression reading `binding`, and whether it is a member access.
pub(crate) fn binding_expr(linked: &Linked, binding: &Binding, format: ModuleFormat) -> (String, bool) {
    match binding {
        Binding::Local { module, name } => (linked.name(*module, name).to_string(), false),
        Binding::Namespace(id) => (namespace_binding(*id), false),
        Binding::ExternalMember { external, name } => {
            (format!("{}{}", external_binding(*external), member(name)), true)
        }
        Binding::ExternalDefault(external) => match format {
            ModuleFormat::Cjs => (format!("{INTEROP}({})", external_binding(*external)), false),
            ModuleFormat::Es => (format!("{}.default", external_binding(*external)), true),
        },
        Binding::ExternalNamespace(external) => (external_binding(*external), false),
    }
}

/// `{ name: () => binding, ... }`, one getter per line.
pub(crate) fn getters(linked: &Linked, members: &NamespaceMembers, format: ModuleFormat) -> String {
    let mut out = String::from("{\n");
    for (name, binding) in &members.members {
        let (expr, _) = binding_expr(linked, binding, format);
        out.push_str(&format!("  {}: () => {expr},\n", property_key(name)));
    }
    out.push('}');
    out
}

fn namespace_object(
    linked: &Linked,
    id: ModuleId,
    members: &NamespaceMembers,
    format: ModuleFormat,
) -> String {
    let getters = getters(linked, members, format);
    if members.external_stars.is_empty() {
        return format!("const {} = {NAMESPACE}({getters});\n", namespace_binding(id));
    }
    let stars = members
        .external_stars
        .iter()
        .map(|idx| external_binding(*idx))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "const {} = {NAMESPACE}({getters}, [{stars}]);\n",
        namespace_binding(id)
    )
}

fn dynamic_import(graph: &ModuleGraph, target: Target, format: ModuleFormat) -> String {
    match target {
        Target::Local(id) => format!("Promise.resolve().then(() => {})", namespace_binding(id)),
        Target::External(idx) => {
            let specifier = js_string(&graph.externals()[idx].specifier);
            match format {
                ModuleFormat::Cjs => format!("Promise.resolve().then(() => require({specifier}))"),
                ModuleFormat::Es => format!("import({specifier})"),
            }
        }
    }
}

/// Double-quoted JavaScript string literal.
pub(crate) fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Name in an export list or property key position.
pub(crate) fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        js_string(name)
    }
}

pub(crate) fn member(name: &str) -> String {
    if is_identifier(name) {
        format!(".{name}")
    } else {
        format!("[{}]", js_string(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_identifier("parser"));
        assert!(is_identifier("$_x1"));
        assert!(is_identifier("default"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("x y"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn string_literals_are_escaped() {
        assert_eq!(js_string("@lezer/lr"), "\"@lezer/lr\"");
        assert_eq!(js_string("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn member_access_quotes_non_identifiers() {
        assert_eq!(member("parser"), ".parser");
        assert_eq!(member("x y"), "[\"x y\"]");
    }

    #[test]
    fn external_members_are_called_without_a_receiver() {
        let linked = Linked::default();
        let module = Module {
            id: ModuleId(0),
            path: "index.js".into(),
            display_path: "index.js".into(),
            source: String::new(),
            scan: Default::default(),
            targets: Vec::new(),
        };
        let symbol = |callee, shorthand| SymbolRef {
            name: "local".into(),
            callee,
            shorthand,
        };

        // Unlinked names fall back to themselves
        assert_eq!(symbol_text(&linked, &module, &symbol(true, false), ModuleFormat::Es), "local");
        assert_eq!(symbol_text(&linked, &module, &symbol(false, true), ModuleFormat::Es), "local");

        let member = Binding::ExternalMember {
            external: 2,
            name: "styleTags".into(),
        };
        assert_eq!(
            binding_expr(&linked, &member, ModuleFormat::Cjs),
            ("__bale_ext_2.styleTags".to_string(), true)
        );
        assert_eq!(
            binding_expr(&linked, &Binding::ExternalDefault(1), ModuleFormat::Cjs).0,
            "__bale_interop(__bale_ext_1)"
        );
        assert_eq!(
            binding_expr(&linked, &Binding::ExternalDefault(1), ModuleFormat::Es).0,
            "__bale_ext_1.default"
        );
    }
}
