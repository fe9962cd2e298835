// Package and module name derivation from filesystem paths
//
// Names must come out identical on every run over an unchanged tree, so
// everything here is a pure function of the path text.

use crate::error::{Error, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Sentinel used when no package name can be derived from a path
pub const FALLBACK_PACKAGE_NAME: &str = "unknown_package";

/// Directory names that hold a package rather than being one
const GENERIC_CONTAINERS: &[&str] = &["src", "lib", "site-packages", "dist-packages"];

/// Trailing version suffix on a directory name: `-1.2.3`, `_v2`, `-2.0`
fn version_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-_]v?\d+(?:\.\d+)*$").expect("valid pattern"))
}

/// Runs of separators that normalize to a single underscore
fn separator_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-.]+").expect("valid pattern"))
}

/// Derive a canonical package name from a directory path.
///
/// The final path segment has any trailing version suffix stripped; generic
/// container segments (`src`, `site-packages`, ...) defer to their parent;
/// remaining `-`/`.` runs become `_` and the result is lowercased. The suffix
/// pattern anchors to the end of the segment, so embedded dots as in `pkg.v2`
/// survive into normalization instead of being treated as a version.
pub fn derive_package_name(path: &Path) -> Result<String> {
    let segments: Vec<&str> = path
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();

    for segment in segments.iter().rev() {
        let stripped = version_suffix().replace(segment, "");
        if stripped.is_empty() {
            return Err(Error::name_derivation(segment.to_string()));
        }

        if GENERIC_CONTAINERS.contains(&stripped.to_lowercase().as_str()) {
            continue;
        }

        let normalized = separator_runs().replace_all(&stripped, "_").to_lowercase();
        if normalized.chars().all(|c| c == '_') {
            return Err(Error::name_derivation(segment.to_string()));
        }
        return Ok(normalized);
    }

    Err(Error::name_derivation(path.display().to_string()))
}

/// Derive a module's dotted name from its path relative to the scan root.
///
/// Separators become dots, the `.py` suffix is stripped, and `__init__`
/// segments are removed, so `sub/module.py` under `testpkg` is
/// `testpkg.sub.module` and `__init__.py` is `testpkg` itself.
pub fn derive_module_name(package_name: &str, relative: &Path) -> String {
    let mut parts: Vec<String> = relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .map(String::from)
        .collect();

    if let Some(last) = parts.last_mut() {
        if let Some(stem) = last.strip_suffix(".py") {
            *last = stem.to_string();
        }
    }

    parts.retain(|p| p != "__init__" && !p.is_empty());

    if parts.is_empty() {
        package_name.to_string()
    } else {
        format!("{}.{}", package_name, parts.join("."))
    }
}
