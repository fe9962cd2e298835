// Package metadata collaborator
//
// The analysis core treats metadata as an opaque string mapping merged into
// the result; what the keys mean is the formatter's business.

use std::collections::BTreeMap;
use std::path::Path;

/// Supplies author/version/license style metadata for an analyzed package
pub trait MetadataProvider {
    fn get_metadata(&self, root: &Path) -> BTreeMap<String, String>;
}

/// Provider that supplies nothing
pub struct NullMetadata;

impl MetadataProvider for NullMetadata {
    fn get_metadata(&self, _root: &Path) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}

/// Reads `[project]` keys from a `pyproject.toml` at the package root
pub struct PyprojectMetadata;

impl MetadataProvider for PyprojectMetadata {
    fn get_metadata(&self, root: &Path) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();

        let Ok(contents) = std::fs::read_to_string(root.join("pyproject.toml")) else {
            return map;
        };
        let Ok(value) = contents.parse::<toml::Value>() else {
            return map;
        };
        let Some(project) = value.get("project") else {
            return map;
        };

        for key in ["name", "version", "description"] {
            if let Some(v) = project.get(key).and_then(toml::Value::as_str) {
                map.insert(key.to_string(), v.to_string());
            }
        }

        // `license` is either a string or a table with a `text` key
        if let Some(license) = project.get("license") {
            let text = license
                .as_str()
                .map(str::to_string)
                .or_else(|| {
                    license
                        .get("text")
                        .and_then(toml::Value::as_str)
                        .map(str::to_string)
                });
            if let Some(text) = text {
                map.insert("license".to_string(), text);
            }
        }

        // Authors are tables with `name`/`email` or plain strings
        if let Some(authors) = project.get("authors").and_then(toml::Value::as_array) {
            let names: Vec<String> = authors
                .iter()
                .filter_map(|a| {
                    a.as_str()
                        .map(str::to_string)
                        .or_else(|| a.get("name").and_then(toml::Value::as_str).map(str::to_string))
                })
                .collect();
            if !names.is_empty() {
                map.insert("authors".to_string(), names.join(", "));
            }
        }

        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_null_metadata_is_empty() {
        let map = NullMetadata.get_metadata(Path::new("/anywhere"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_missing_pyproject_is_empty() {
        let dir = TempDir::new().unwrap();
        let map = PyprojectMetadata.get_metadata(dir.path());
        assert!(map.is_empty());
    }

    #[test]
    fn test_project_keys_extracted() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("pyproject.toml"),
            r#"
[project]
name = "mypkg"
version = "2.1.0"
description = "A package"
license = { text = "MIT" }
authors = [{ name = "Ada", email = "ada@example.com" }, "Grace"]
"#,
        )
        .unwrap();

        let map = PyprojectMetadata.get_metadata(dir.path());
        assert_eq!(map.get("name").map(String::as_str), Some("mypkg"));
        assert_eq!(map.get("version").map(String::as_str), Some("2.1.0"));
        assert_eq!(map.get("license").map(String::as_str), Some("MIT"));
        assert_eq!(map.get("authors").map(String::as_str), Some("Ada, Grace"));
    }

    #[test]
    fn test_malformed_toml_is_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pyproject.toml"), "not [ valid").unwrap();
        let map = PyprojectMetadata.get_metadata(dir.path());
        assert!(map.is_empty());
    }
}
