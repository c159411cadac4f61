//! CommonJS wrapper: `require()` for externals, getters on `exports` for
//! the entry's exports.

use bale_config::ModuleFormat;

use super::{external_binding, getters, js_string};
use crate::emit::runtime::{EXPORT, EXPORT_STAR};
use crate::graph::{Linked, ModuleGraph};

pub(super) fn header(out: &mut String, graph: &ModuleGraph) {
    out.push_str("\"use strict\";\n\n");
    let mut any = false;
    for (idx, external) in graph.externals().iter().enumerate() {
        if external.is_static {
            out.push_str(&format!(
                "const {} = require({});\n",
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

/// Getters keep `let` exports live for consumers.
pub(super) fn footer(linked: &Linked) -> String {
    let exports = linked.entry_exports();
    if exports.members.is_empty() && exports.external_stars.is_empty() {
        return String::new();
    }

    let mut out = String::from("Object.defineProperty(exports, \"__esModule\", { value: true });\n");
    if !exports.members.is_empty() {
        out.push_str(&format!(
            "{EXPORT}(exports, {});\n",
            getters(linked, exports, ModuleFormat::Cjs)
        ));
    }
    for idx in &exports.external_stars {
        out.push_str(&format!("{EXPORT_STAR}(exports, {});\n", external_binding(*idx)));
    }
    out
}
