//! Per-module scan: what a module imports, what it exports, and the source
//! edits that let it be concatenated into a single scope.
//!
//! Import and re-export statements are removed. `export` keywords are
//! stripped from declarations. Every occurrence of a top-level binding is
//! recorded so the emitter can rename it, and every reference to an import
//! is recorded so the emitter can point it at the binding it resolves to.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ArrowFunctionExpression, AssignmentTargetPropertyIdentifier, AwaitExpression,
    BindingIdentifier, BindingPattern, BindingPatternKind, BindingProperty, CallExpression,
    Declaration, ExportAllDeclaration, ExportDefaultDeclaration, ExportDefaultDeclarationKind,
    ExportNamedDeclaration, Expression, ForOfStatement, Function, IdentifierReference,
    ImportDeclaration, ImportDeclarationSpecifier, ImportExpression, ModuleDeclaration,
    ModuleExportName, ObjectProperty, TaggedTemplateExpression,
};
use oxc_ast_visit::{Visit, walk};
use oxc_parser::{Parser, ParserReturn};
use oxc_semantic::{ScopeFlags, Scoping, SemanticBuilder, SymbolFlags};
use oxc_span::{GetSpan, SourceType, Span};
use rustc_hash::FxHashSet;

use crate::{Error, Result};

/// Local name bound to an anonymous `export default` value.
pub const DEFAULT_LOCAL: &str = "__bale_default";

/// A distinct specifier requested by a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub specifier: String,
    /// Only ever requested through `import()`
    pub dynamic_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imported {
    Named(String),
    Default,
    Namespace,
}

/// `import { imported as local } from "..."` and friends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub local: String,
    pub imported: Imported,
    pub request: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEntry {
    /// A binding declared in this module
    Local { exported: String, local: String },
    /// `export { imported as exported } from "..."`
    Reexport {
        exported: String,
        imported: String,
        request: usize,
    },
    /// `export * as exported from "..."`
    Namespace { exported: String, request: usize },
}

impl ExportEntry {
    pub fn exported(&self) -> &str {
        match self {
            ExportEntry::Local { exported, .. }
            | ExportEntry::Reexport { exported, .. }
            | ExportEntry::Namespace { exported, .. } => exported,
        }
    }
}

/// An occurrence of a top-level binding or of an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRef {
    pub name: String,
    /// `{ name }` in an object literal or pattern
    pub shorthand: bool,
    /// Callee of a call or tagged template
    pub callee: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    Text(String),
    /// `const <default local> = ` in front of a default-exported expression
    DefaultConst,
    /// ` <default local>` naming an anonymous default function or class
    DefaultName,
    Symbol(SymbolRef),
    /// `import("...")`, rendered once the target is known
    DynamicImport { request: usize },
}

/// Replace `source[start..end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: u32,
    pub end: u32,
    pub replacement: Replacement,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleScan {
    pub requests: Vec<Request>,
    pub imports: Vec<ImportBinding>,
    pub exports: Vec<ExportEntry>,
    /// Requests re-exported wholesale through `export * from`
    pub stars: Vec<usize>,
    /// Sorted by `(start, end)`
    pub edits: Vec<Edit>,
    /// Top-level bindings in declaration order, imports excluded
    pub declared: Vec<String>,
    /// Names bound anywhere below the top-level scope
    pub nested: FxHashSet<String>,
    /// Free references that resolve to nothing in the module
    pub globals: FxHashSet<String>,
    pub top_level_await: bool,
}

impl ModuleScan {
    pub fn has_default_export(&self) -> bool {
        self.exports.iter().any(|entry| entry.exported() == "default")
    }

    pub fn import(&self, local: &str) -> Option<&ImportBinding> {
        self.imports.iter().find(|import| import.local == local)
    }

    /// Apply the edits to `source`. An edit starting inside an earlier one
    /// is skipped.
    pub fn rewrite(&self, source: &str, mut render: impl FnMut(&Replacement) -> String) -> String {
        let mut out = String::with_capacity(source.len());
        let mut cursor = 0usize;
        for edit in &self.edits {
            let (start, end) = (edit.start as usize, edit.end as usize);
            if start < cursor {
                continue;
            }
            out.push_str(&source[cursor..start]);
            out.push_str(&render(&edit.replacement));
            cursor = end;
        }
        out.push_str(&source[cursor..]);
        out
    }
}

/// Parse `source` as an ES module and scan it.
pub fn scan_module(path: &Path, source: &str) -> Result<ModuleScan> {
    let allocator = Allocator::default();
    let ParserReturn {
        program, errors, ..
    } = Parser::new(&allocator, source, SourceType::mjs()).parse();

    let parse_error = |message: String| Error::Parse {
        path: path.to_path_buf(),
        message,
    };
    if let Some(first) = errors.first() {
        return Err(parse_error(first.to_string()));
    }

    let semantic_ret = SemanticBuilder::new().build(&program);
    if let Some(first) = semantic_ret.errors.first() {
        return Err(parse_error(first.to_string()));
    }
    let scoping = semantic_ret.semantic.scoping();

    let mut scanner = Scanner::default();
    for stmt in &program.body {
        if let Some(module_decl) = stmt.as_module_declaration() {
            match module_decl {
                ModuleDeclaration::ImportDeclaration(import) => scanner.import(import),
                ModuleDeclaration::ExportNamedDeclaration(named) => scanner.export_named(named),
                ModuleDeclaration::ExportDefaultDeclaration(default_decl) => {
                    scanner.export_default(default_decl)
                }
                ModuleDeclaration::ExportAllDeclaration(all) => scanner.export_all(all),
                _ => {}
            }
        }
    }

    let root = scoping.root_scope_id();
    for symbol in scoping.symbol_ids() {
        if scoping.symbol_scope_id(symbol) == root
            && !scoping.symbol_flags(symbol).contains(SymbolFlags::Import)
        {
            scanner.scan.declared.push(scoping.symbol_name(symbol).to_string());
        }
    }
    if scanner.default_local {
        scanner.scan.declared.push(DEFAULT_LOCAL.to_string());
    }

    let mut refs = References::new(scoping);
    refs.visit_program(&program);

    for (span, symbol) in refs.occurrences {
        scanner.edit(span.start, span.end, Replacement::Symbol(symbol));
    }
    for (span, specifier) in refs.dynamic {
        let request = scanner.request(&specifier, true);
        scanner.edit(span.start, span.end, Replacement::DynamicImport { request });
    }

    let mut scan = scanner.scan;
    scan.nested = refs.nested;
    scan.globals = refs.globals;
    scan.top_level_await = refs.top_level_await;
    scan.edits.sort_by_key(|edit| (edit.start, edit.end));
    Ok(scan)
}

#[derive(Default)]
struct Scanner {
    scan: ModuleScan,
    default_local: bool,
}

impl Scanner {
    fn request(&mut self, specifier: &str, dynamic: bool) -> usize {
        if let Some(idx) = self
            .scan
            .requests
            .iter()
            .position(|r| r.specifier == specifier)
        {
            let existing = &mut self.scan.requests[idx];
            existing.dynamic_only &= dynamic;
            return idx;
        }
        self.scan.requests.push(Request {
            specifier: specifier.to_string(),
            dynamic_only: dynamic,
        });
        self.scan.requests.len() - 1
    }

    fn edit(&mut self, start: u32, end: u32, replacement: Replacement) {
        self.scan.edits.push(Edit {
            start,
            end,
            replacement,
        });
    }

    fn remove(&mut self, start: u32, end: u32) {
        self.edit(start, end, Replacement::Text(String::new()));
    }

    fn import(&mut self, import: &ImportDeclaration<'_>) {
        let request = self.request(import.source.value.as_str(), false);
        self.remove(import.span.start, import.span.end);

        let Some(specifiers) = &import.specifiers else {
            return;
        };
        for spec in specifiers {
            let (local, imported) = match spec {
                ImportDeclarationSpecifier::ImportDefaultSpecifier(default_spec) => {
                    (&default_spec.local, Imported::Default)
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(ns_spec) => {
                    (&ns_spec.local, Imported::Namespace)
                }
                ImportDeclarationSpecifier::ImportSpecifier(named_spec) => {
                    let name = export_name(&named_spec.imported);
                    let imported = if name == "default" {
                        Imported::Default
                    } else {
                        Imported::Named(name)
                    };
                    (&named_spec.local, imported)
                }
            };
            self.scan.imports.push(ImportBinding {
                local: local.name.to_string(),
                imported,
                request,
            });
        }
    }

    fn export_named(&mut self, named: &ExportNamedDeclaration<'_>) {
        if let Some(decl) = &named.declaration {
            self.remove(named.span.start, decl.span().start);
            for name in declared_names(decl) {
                self.scan.exports.push(ExportEntry::Local {
                    exported: name.clone(),
                    local: name,
                });
            }
            return;
        }

        self.remove(named.span.start, named.span.end);
        match &named.source {
            Some(source) => {
                let request = self.request(source.value.as_str(), false);
                for spec in &named.specifiers {
                    self.scan.exports.push(ExportEntry::Reexport {
                        exported: export_name(&spec.exported),
                        imported: export_name(&spec.local),
                        request,
                    });
                }
            }
            None => {
                for spec in &named.specifiers {
                    self.scan.exports.push(ExportEntry::Local {
                        exported: export_name(&spec.exported),
                        local: export_name(&spec.local),
                    });
                }
            }
        }
    }

    fn export_default(&mut self, decl: &ExportDefaultDeclaration<'_>) {
        let decl_span = decl.declaration.span();
        // Anonymous functions and classes stay declarations and get a name
        let anonymous_at = match &decl.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(func) => match &func.id {
                Some(id) => Err(id.name.to_string()),
                None => Ok(Some(func.params.span.start)),
            },
            ExportDefaultDeclarationKind::ClassDeclaration(class) => match &class.id {
                Some(id) => Err(id.name.to_string()),
                None => Ok(Some(class.span.start + "class".len() as u32)),
            },
            _ => Ok(None),
        };

        let local = match anonymous_at {
            Err(id) => {
                self.remove(decl.span.start, decl_span.start);
                id
            }
            Ok(Some(at)) => {
                self.remove(decl.span.start, decl_span.start);
                self.edit(at, at, Replacement::DefaultName);
                self.default_local = true;
                DEFAULT_LOCAL.to_string()
            }
            Ok(None) => {
                self.edit(decl.span.start, decl_span.start, Replacement::DefaultConst);
                self.default_local = true;
                DEFAULT_LOCAL.to_string()
            }
        };

        self.scan.exports.push(ExportEntry::Local {
            exported: "default".into(),
            local,
        });
    }

    fn export_all(&mut self, all: &ExportAllDeclaration<'_>) {
        let request = self.request(all.source.value.as_str(), false);
        self.remove(all.span.start, all.span.end);
        match &all.exported {
            Some(exported) => self.scan.exports.push(ExportEntry::Namespace {
                exported: export_name(exported),
                request,
            }),
            None => self.scan.stars.push(request),
        }
    }
}

fn export_name(name: &ModuleExportName<'_>) -> String {
    match name {
        ModuleExportName::IdentifierName(ident) => ident.name.to_string(),
        ModuleExportName::IdentifierReference(ident) => ident.name.to_string(),
        ModuleExportName::StringLiteral(lit) => lit.value.to_string(),
    }
}

fn declared_names(decl: &Declaration<'_>) -> Vec<String> {
    let mut names = Vec::new();
    match decl {
        Declaration::VariableDeclaration(var) => {
            for declarator in &var.declarations {
                binding_names(&declarator.id, &mut names);
            }
        }
        Declaration::FunctionDeclaration(func) => {
            if let Some(id) = &func.id {
                names.push(id.name.to_string());
            }
        }
        Declaration::ClassDeclaration(class) => {
            if let Some(id) = &class.id {
                names.push(id.name.to_string());
            }
        }
        _ => {}
    }
    names
}

fn binding_names(pattern: &BindingPattern<'_>, names: &mut Vec<String>) {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(ident) => names.push(ident.name.to_string()),
        BindingPatternKind::ObjectPattern(object) => {
            for property in &object.properties {
                binding_names(&property.value, names);
            }
            if let Some(rest) = &object.rest {
                binding_names(&rest.argument, names);
            }
        }
        BindingPatternKind::ArrayPattern(array) => {
            for element in array.elements.iter().flatten() {
                binding_names(element, names);
            }
            if let Some(rest) = &array.rest {
                binding_names(&rest.argument, names);
            }
        }
        BindingPatternKind::AssignmentPattern(assign) => binding_names(&assign.left, names),
    }
}

/// Occurrences of top-level bindings, literal `import()` calls, and the
/// names the emitter must not collide with.
struct References<'s> {
    scoping: &'s Scoping,
    /// Start offsets of shorthand property identifiers
    shorthand: FxHashSet<u32>,
    occurrences: Vec<(Span, SymbolRef)>,
    dynamic: Vec<(Span, String)>,
    nested: FxHashSet<String>,
    globals: FxHashSet<String>,
    function_depth: u32,
    top_level_await: bool,
}

impl<'s> References<'s> {
    fn new(scoping: &'s Scoping) -> Self {
        Self {
            scoping,
            shorthand: FxHashSet::default(),
            occurrences: Vec::new(),
            dynamic: Vec::new(),
            nested: FxHashSet::default(),
            globals: FxHashSet::default(),
            function_depth: 0,
            top_level_await: false,
        }
    }

    fn record(&mut self, span: Span, name: &str, callee: bool) {
        let shorthand = self.shorthand.contains(&span.start);
        self.occurrences.push((
            span,
            SymbolRef {
                name: name.to_string(),
                shorthand,
                callee,
            },
        ));
    }

    fn reference(&mut self, ident: &IdentifierReference<'_>, callee: bool) {
        let symbol = ident
            .reference_id
            .get()
            .and_then(|id| self.scoping.get_reference(id).symbol_id());
        match symbol {
            None => {
                self.globals.insert(ident.name.to_string());
            }
            Some(symbol) if self.scoping.symbol_scope_id(symbol) == self.scoping.root_scope_id() => {
                let name = self.scoping.symbol_name(symbol).to_string();
                self.record(ident.span, &name, callee);
            }
            Some(_) => {}
        }
    }

    fn mark_shorthand(&mut self, pattern: &BindingPattern<'_>) {
        match &pattern.kind {
            BindingPatternKind::BindingIdentifier(ident) => {
                self.shorthand.insert(ident.span.start);
            }
            BindingPatternKind::AssignmentPattern(assign) => self.mark_shorthand(&assign.left),
            _ => {}
        }
    }
}

impl<'a> Visit<'a> for References<'_> {
    fn visit_import_declaration(&mut self, _: &ImportDeclaration<'a>) {}

    fn visit_export_all_declaration(&mut self, _: &ExportAllDeclaration<'a>) {}

    fn visit_export_named_declaration(&mut self, named: &ExportNamedDeclaration<'a>) {
        if let Some(decl) = &named.declaration {
            self.visit_declaration(decl);
        }
    }

    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        self.reference(ident, false);
    }

    fn visit_binding_identifier(&mut self, ident: &BindingIdentifier<'a>) {
        let Some(symbol) = ident.symbol_id.get() else {
            return;
        };
        if self.scoping.symbol_scope_id(symbol) != self.scoping.root_scope_id() {
            self.nested.insert(ident.name.to_string());
        } else if !self.scoping.symbol_flags(symbol).contains(SymbolFlags::Import) {
            self.record(ident.span, ident.name.as_str(), false);
        }
    }

    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if let Expression::Identifier(ident) = &call.callee {
            self.reference(ident, true);
            self.visit_arguments(&call.arguments);
            return;
        }
        walk::walk_call_expression(self, call);
    }

    fn visit_tagged_template_expression(&mut self, tagged: &TaggedTemplateExpression<'a>) {
        if let Expression::Identifier(ident) = &tagged.tag {
            self.reference(ident, true);
            self.visit_template_literal(&tagged.quasi);
            return;
        }
        walk::walk_tagged_template_expression(self, tagged);
    }

    fn visit_object_property(&mut self, prop: &ObjectProperty<'a>) {
        if prop.shorthand {
            if let Expression::Identifier(ident) = &prop.value {
                self.shorthand.insert(ident.span.start);
            }
        }
        walk::walk_object_property(self, prop);
    }

    fn visit_binding_property(&mut self, prop: &BindingProperty<'a>) {
        if prop.shorthand {
            self.mark_shorthand(&prop.value);
        }
        walk::walk_binding_property(self, prop);
    }

    fn visit_assignment_target_property_identifier(
        &mut self,
        prop: &AssignmentTargetPropertyIdentifier<'a>,
    ) {
        self.shorthand.insert(prop.binding.span.start);
        walk::walk_assignment_target_property_identifier(self, prop);
    }

    fn visit_function(&mut self, func: &Function<'a>, flags: ScopeFlags) {
        self.function_depth += 1;
        walk::walk_function(self, func, flags);
        self.function_depth -= 1;
    }

    fn visit_arrow_function_expression(&mut self, arrow: &ArrowFunctionExpression<'a>) {
        self.function_depth += 1;
        walk::walk_arrow_function_expression(self, arrow);
        self.function_depth -= 1;
    }

    fn visit_await_expression(&mut self, expr: &AwaitExpression<'a>) {
        if self.function_depth == 0 {
            self.top_level_await = true;
        }
        walk::walk_await_expression(self, expr);
    }

    fn visit_for_of_statement(&mut self, stmt: &ForOfStatement<'a>) {
        if stmt.r#await && self.function_depth == 0 {
            self.top_level_await = true;
        }
        walk::walk_for_of_statement(self, stmt);
    }

    fn visit_import_expression(&mut self, expr: &ImportExpression<'a>) {
        if let Expression::StringLiteral(lit) = &expr.source {
            // The whole call is replaced; nothing inside it survives
            self.dynamic.push((expr.span, lit.value.to_string()));
            return;
        }
        walk::walk_import_expression(self, expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> ModuleScan {
        scan_module(Path::new("test.js"), source).expect("scan")
    }

    /// Renders symbols as `<name>` so rewritten occurrences stand out.
    fn rewrite(source: &str) -> String {
        scan(source).rewrite(source, |replacement| match replacement {
            Replacement::Text(text) => text.clone(),
            Replacement::DefaultConst => "const DEFAULT = ".into(),
            Replacement::DefaultName => " DEFAULT".into(),
            Replacement::Symbol(symbol) if symbol.shorthand => {
                format!("{}: <{}>", symbol.name, symbol.name)
            }
            Replacement::Symbol(symbol) if symbol.callee => format!("call<{}>", symbol.name),
            Replacement::Symbol(symbol) => format!("<{}>", symbol.name),
            Replacement::DynamicImport { request } => format!("LOAD({request})"),
        })
    }

    #[test]
    fn collects_import_bindings_in_order() {
        let scan = scan(
            "import def, { a, b as c, default as d } from './dep.js';\nimport * as ns from 'pkg';\nimport './side.js';\n",
        );

        assert_eq!(
            scan.requests
                .iter()
                .map(|r| r.specifier.as_str())
                .collect::<Vec<_>>(),
            vec!["./dep.js", "pkg", "./side.js"]
        );
        let binding = |local: &str, imported: Imported, request| ImportBinding {
            local: local.into(),
            imported,
            request,
        };
        assert_eq!(
            scan.imports,
            vec![
                binding("def", Imported::Default, 0),
                binding("a", Imported::Named("a".into()), 0),
                binding("c", Imported::Named("b".into()), 0),
                binding("d", Imported::Default, 0),
                binding("ns", Imported::Namespace, 1),
            ]
        );
        assert!(scan.declared.is_empty());
    }

    #[test]
    fn strips_export_keywords_from_declarations() {
        let source = "export const a = 1, { b, c: [d] } = obj;\nexport function f() {}\nexport class K {}\n";
        let scan = scan(source);

        let names: Vec<_> = scan.exports.iter().map(|e| e.exported().to_string()).collect();
        assert_eq!(names, vec!["a", "b", "d", "f", "K"]);
        assert_eq!(scan.declared, vec!["a", "b", "d", "f", "K"]);
        assert_eq!(
            rewrite(source),
            "const <a> = 1, { b: <b>, c: [<d>] } = obj;\nfunction <f>() {}\nclass <K> {}\n"
        );
    }

    #[test]
    fn export_lists_are_removed() {
        let source = "const x = 1;\nexport { x as y, x };\n";
        let scan = scan(source);

        assert_eq!(
            scan.exports,
            vec![
                ExportEntry::Local {
                    exported: "y".into(),
                    local: "x".into()
                },
                ExportEntry::Local {
                    exported: "x".into(),
                    local: "x".into()
                },
            ]
        );
        assert_eq!(rewrite(source), "const <x> = 1;\n\n");
    }

    #[test]
    fn default_exports_bind_a_local() {
        assert_eq!(rewrite("export default 40 + 2;"), "const DEFAULT = 40 + 2;");
        assert_eq!(
            rewrite("export default function () {}"),
            "function  DEFAULT() {}"
        );
        assert_eq!(rewrite("export default class {}"), "class DEFAULT {}");
        assert_eq!(rewrite("export default class Named {}"), "class <Named> {}");

        let scan = scan("export default function named() {}");
        assert!(scan.has_default_export());
        assert_eq!(
            scan.exports[0],
            ExportEntry::Local {
                exported: "default".into(),
                local: "named".into()
            }
        );

        let anonymous = scan_module(Path::new("t.js"), "export default () => 1;").unwrap();
        assert_eq!(anonymous.declared, vec![DEFAULT_LOCAL]);
    }

    #[test]
    fn reexports_are_recorded_against_their_request() {
        let scan = scan(
            "export { a as b, default } from './dep.js';\nexport * from './all.js';\nexport * as ns from 'pkg';\n",
        );

        assert_eq!(
            scan.exports,
            vec![
                ExportEntry::Reexport {
                    exported: "b".into(),
                    imported: "a".into(),
                    request: 0
                },
                ExportEntry::Reexport {
                    exported: "default".into(),
                    imported: "default".into(),
                    request: 0
                },
                ExportEntry::Namespace {
                    exported: "ns".into(),
                    request: 2
                },
            ]
        );
        assert_eq!(scan.stars, vec![1]);
    }

    #[test]
    fn import_references_are_recorded_with_their_context() {
        let source = "import { a, b, tag } from './dep.js';\nconst o = { a };\nb(a);\ntag`x`;\n";
        assert_eq!(
            rewrite(source),
            "\nconst <o> = { a: <a> };\ncall<b>(<a>);\ncall<tag>`x`;\n"
        );
    }

    #[test]
    fn nested_bindings_are_left_alone() {
        let source = "const x = 1;\nfunction f(x) { let y = x; return y; }\nconsole.log(x);\n";
        let scan = scan(source);

        assert_eq!(
            rewrite(source),
            "const <x> = 1;\nfunction <f>(x) { let y = x; return y; }\nconsole.log(<x>);\n"
        );
        assert!(scan.nested.contains("x") && scan.nested.contains("y"));
        assert!(scan.globals.contains("console"));
        assert!(!scan.globals.contains("x"));
    }

    #[test]
    fn shorthand_patterns_keep_their_keys() {
        let source = "const { a, b = 2 } = obj;\n({ a } = obj);\n";
        assert_eq!(
            rewrite(source),
            "const { a: <a>, b: <b> = 2 } = obj;\n({ a: <a> } = obj);\n"
        );
    }

    #[test]
    fn dynamic_imports_are_rewritten_in_place() {
        let source = "const lazy = () => import('./lazy.js');\nimport(name);\n";
        let scan = scan(source);

        assert_eq!(
            scan.requests,
            vec![Request {
                specifier: "./lazy.js".into(),
                dynamic_only: true
            }]
        );
        assert_eq!(
            rewrite(source),
            "const <lazy> = () => LOAD(0);\nimport(name);\n"
        );
    }

    #[test]
    fn nested_dynamic_import_does_not_overlap() {
        let source = "import('./a.js', import('./b.js'));\n";
        let scan = scan(source);

        assert_eq!(scan.requests.len(), 1);
        assert_eq!(rewrite(source), "LOAD(0);\n");
    }

    #[test]
    fn rewrite_skips_edits_inside_earlier_ones() {
        let edit = |start, end, text: &str| Edit {
            start,
            end,
            replacement: Replacement::Text(text.into()),
        };
        let scan = ModuleScan {
            edits: vec![edit(0, 6, "outer"), edit(2, 4, "inner"), edit(7, 8, "z")],
            ..ModuleScan::default()
        };

        let out = scan.rewrite("abcdef y", |replacement| match replacement {
            Replacement::Text(text) => text.clone(),
            _ => String::new(),
        });
        assert_eq!(out, "outer z");
    }

    #[test]
    fn top_level_await_is_detected() {
        assert!(scan("const v = await load();").top_level_await);
        assert!(scan("for await (const x of xs) {}").top_level_await);
        assert!(!scan("async function f() { await load(); }").top_level_await);
        assert!(!scan("const f = async () => { for await (const x of xs) {} };").top_level_await);
    }

    #[test]
    fn static_import_clears_dynamic_only() {
        let scan = scan("import './a.js';\nimport('./a.js');\n");
        assert_eq!(scan.requests.len(), 1);
        assert!(!scan.requests[0].dynamic_only);
    }

    #[test]
    fn syntax_errors_name_the_file() {
        let err = scan_module(Path::new("broken.js"), "export const = ;").unwrap_err();
        match err {
            Error::Parse { path, .. } => assert_eq!(path, Path::new("broken.js")),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }
}
