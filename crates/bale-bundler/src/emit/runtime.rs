//! Helpers a bundle may call. Only the ones a bundle references are emitted.

pub const EXPORT: &str = "__bale_export";
pub const EXPORT_STAR: &str = "__bale_export_star";
pub const NAMESPACE: &str = "__bale_namespace";
pub const INTEROP: &str = "__bale_interop";

pub const HELPER_NAMES: [&str; 4] = [EXPORT, EXPORT_STAR, NAMESPACE, INTEROP];

struct Helper {
    name: &'static str,
    code: &'static str,
    uses: &'static [&'static str],
}

/// Dependencies come before the helpers that use them.
const HELPERS: [Helper; 4] = [
    Helper {
        name: EXPORT,
        code: r#"function __bale_export(target, getters) {
  for (const name of Object.keys(getters)) {
    Object.defineProperty(target, name, { enumerable: true, get: getters[name] });
  }
}
"#,
        uses: &[],
    },
    Helper {
        name: EXPORT_STAR,
        code: r#"function __bale_export_star(target, source) {
  for (const name of Object.keys(source)) {
    if (name !== "default" && !Object.prototype.hasOwnProperty.call(target, name)) {
      Object.defineProperty(target, name, { enumerable: true, get: () => source[name] });
    }
  }
}
"#,
        uses: &[],
    },
    Helper {
        name: NAMESPACE,
        code: r#"function __bale_namespace(getters, stars = []) {
  const ns = Object.create(null);
  __bale_export(ns, getters);
  for (const source of stars) __bale_export_star(ns, source);
  Object.defineProperty(ns, Symbol.toStringTag, { value: "Module" });
  return Object.freeze(ns);
}
"#,
        uses: &[EXPORT, EXPORT_STAR],
    },
    Helper {
        name: INTEROP,
        code: r#"function __bale_interop(ns) {
  return ns && (ns.__esModule || Object.prototype.hasOwnProperty.call(ns, "default")) ? ns.default : ns;
}
"#,
        uses: &[],
    },
];

/// Append every helper called from `texts`, and what those helpers call.
pub(crate) fn push_helpers(out: &mut String, texts: &[&str]) {
    let mut used: Vec<bool> = HELPERS
        .iter()
        .map(|helper| {
            let call = format!("{}(", helper.name);
            texts.iter().any(|text| text.contains(&call))
        })
        .collect();
    for idx in (0..HELPERS.len()).rev() {
        if used[idx] {
            for dep in HELPERS[idx].uses {
                if let Some(pos) = HELPERS.iter().position(|helper| helper.name == *dep) {
                    used[pos] = true;
                }
            }
        }
    }

    for (helper, used) in HELPERS.iter().zip(used) {
        if used {
            out.push_str(helper.code);
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_called_helpers_are_emitted() {
        let mut out = String::new();
        push_helpers(&mut out, &["__bale_export(exports, {});"]);
        assert!(out.contains("function __bale_export(target"));
        assert!(!out.contains("function __bale_export_star"));
        assert!(!out.contains("function __bale_interop"));

        let mut out = String::new();
        push_helpers(&mut out, &["const x = 1;"]);
        assert!(out.is_empty());
    }

    #[test]
    fn namespace_pulls_in_its_dependencies() {
        let mut out = String::new();
        push_helpers(&mut out, &["const __bale_ns_1 = __bale_namespace({});"]);

        let export = out.find("function __bale_export(").unwrap();
        let star = out.find("function __bale_export_star(").unwrap();
        let namespace = out.find("function __bale_namespace(").unwrap();
        assert!(export < star && star < namespace);
    }
}
