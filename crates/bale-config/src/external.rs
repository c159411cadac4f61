//! Package-name helpers for the external allow-list.
//!
//! Externals are matched on the package root only. A subpath import such as
//! `@lezer/lr/dist/index.js` belongs to `@lezer/lr`; `react-dom` does not
//! belong to `react`.

use std::path::Path;

/// Whether a specifier names a package rather than a file.
pub fn is_bare_specifier(specifier: &str) -> bool {
    if specifier.is_empty() || specifier == "." || specifier == ".." {
        return false;
    }

    if specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/') {
        return false;
    }

    !Path::new(specifier).is_absolute()
}

/// Package root of a bare specifier.
///
/// Returns `None` for relative or absolute specifiers.
///
/// ```
/// use bale_config::package_root;
///
/// assert_eq!(package_root("@lezer/lr/dist/index.js"), Some("@lezer/lr"));
/// assert_eq!(package_root("lodash/fp"), Some("lodash"));
/// assert_eq!(package_root("./local.js"), None);
/// ```
pub fn package_root(specifier: &str) -> Option<&str> {
    if !is_bare_specifier(specifier) {
        return None;
    }

    let mut slashes = specifier.match_indices('/').map(|(idx, _)| idx);
    let end = if specifier.starts_with('@') {
        slashes.nth(1)
    } else {
        slashes.next()
    };

    Some(match end {
        Some(idx) => &specifier[..idx],
        None => specifier,
    })
}
