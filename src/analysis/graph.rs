// Package-wide dependency graph assembly
//
// The graph is deliberately a flat tagged-edge list per module rather than a
// typed multigraph: the downstream formatter renders one textual adjacency
// list per module and nothing else walks it.

use crate::analysis::imports::ImportCategory;
use crate::analysis::scanner::ModuleRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Whole-package adjacency structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DependencyGraph {
    /// Module name to tagged dependency list; keys are exactly the set of
    /// module names in the analysis
    pub edges: BTreeMap<String, Vec<String>>,
    /// Distinct external package roots across all modules
    pub external_deps: BTreeSet<String>,
}

impl DependencyGraph {
    /// Look up the tagged dependency list of one module
    pub fn dependencies_of(&self, module: &str) -> Option<&[String]> {
        self.edges.get(module).map(Vec::as_slice)
    }

    /// Number of modules in the graph
    pub fn module_count(&self) -> usize {
        self.edges.len()
    }

    /// Total number of tagged edges
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

/// Aggregate module records into the package dependency graph.
///
/// Internal edges come from each module's declared internal dependencies,
/// re-filtered against the package prefix in case an upstream stage
/// mis-tagged something. Stdlib and external imports are re-tagged as
/// `stdlib:<root>` / `external:<root>` and appended in first-seen import
/// order, deduplicated per module, so regenerated output stays diffable.
pub fn build_graph(modules: &[ModuleRecord], package_name: &str) -> DependencyGraph {
    let prefix = format!("{}.", package_name);
    let mut edges: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut external_deps: BTreeSet<String> = BTreeSet::new();

    for module in modules {
        let mut list: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for dep in &module.internal_deps {
            if dep == package_name || dep.starts_with(&prefix) {
                if seen.insert(dep.clone()) {
                    list.push(dep.clone());
                }
            }
        }

        for record in &module.imports {
            let tag = match record.kind {
                ImportCategory::Internal => continue,
                ImportCategory::Stdlib => format!("stdlib:{}", record.source_root),
                ImportCategory::External => {
                    external_deps.insert(record.source_root.clone());
                    format!("external:{}", record.source_root)
                }
            };
            if seen.insert(tag.clone()) {
                list.push(tag);
            }
        }

        edges.insert(module.name.clone(), list);
    }

    DependencyGraph {
        edges,
        external_deps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::imports::ImportRecord;
    use std::path::PathBuf;

    fn import(full_path: &str, kind: ImportCategory) -> ImportRecord {
        ImportRecord {
            full_path: full_path.to_string(),
            local_name: full_path.rsplit('.').next().unwrap().to_string(),
            kind,
            source_root: full_path.split('.').next().unwrap().to_string(),
        }
    }

    fn module(name: &str, imports: Vec<ImportRecord>) -> ModuleRecord {
        let internal_deps = imports
            .iter()
            .filter(|r| r.kind == ImportCategory::Internal)
            .map(|r| r.full_path.clone())
            .collect();
        ModuleRecord {
            name: name.to_string(),
            path: PathBuf::from(format!("{}.py", name.replace('.', "/"))),
            imports,
            internal_deps,
            constants: BTreeMap::new(),
            docstrings: BTreeMap::new(),
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph = build_graph(&[], "pkg");
        assert_eq!(graph.module_count(), 0);
        assert!(graph.external_deps.is_empty());
    }

    #[test]
    fn test_keys_match_module_names_exactly() {
        let modules = vec![
            module("pkg", vec![]),
            module("pkg.a", vec![import("os", ImportCategory::Stdlib)]),
            module("pkg.b", vec![]),
        ];
        let graph = build_graph(&modules, "pkg");

        let keys: Vec<&str> = graph.edges.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["pkg", "pkg.a", "pkg.b"]);
        assert_eq!(graph.dependencies_of("pkg.b"), Some(&[][..]));
    }

    #[test]
    fn test_tagged_edges() {
        let modules = vec![module(
            "pkg.a",
            vec![
                import("pkg.b", ImportCategory::Internal),
                import("os.path", ImportCategory::Stdlib),
                import("requests.sessions", ImportCategory::External),
            ],
        )];
        let graph = build_graph(&modules, "pkg");

        assert_eq!(
            graph.dependencies_of("pkg.a").unwrap(),
            &[
                "pkg.b".to_string(),
                "stdlib:os".to_string(),
                "external:requests".to_string()
            ]
        );
    }

    #[test]
    fn test_internal_refilter_drops_foreign_tags() {
        // A mis-tagged internal dep from another package is dropped
        let mut record = module("pkg.a", vec![]);
        record.internal_deps.insert("otherpkg.x".to_string());
        record.internal_deps.insert("pkg.b".to_string());

        let graph = build_graph(&[record], "pkg");
        assert_eq!(graph.dependencies_of("pkg.a").unwrap(), &["pkg.b".to_string()]);
    }

    #[test]
    fn test_external_deps_dedup_by_root() {
        let modules = vec![
            module(
                "pkg.a",
                vec![
                    import("numpy.linalg", ImportCategory::External),
                    import("numpy.random", ImportCategory::External),
                ],
            ),
            module("pkg.b", vec![import("numpy", ImportCategory::External)]),
        ];
        let graph = build_graph(&modules, "pkg");

        assert_eq!(graph.external_deps.len(), 1);
        assert!(graph.external_deps.contains("numpy"));
    }

    #[test]
    fn test_edges_dedup_per_module_first_seen() {
        let modules = vec![module(
            "pkg.a",
            vec![
                import("os", ImportCategory::Stdlib),
                import("sys", ImportCategory::Stdlib),
                import("os.path", ImportCategory::Stdlib),
            ],
        )];
        let graph = build_graph(&modules, "pkg");

        assert_eq!(
            graph.dependencies_of("pkg.a").unwrap(),
            &["stdlib:os".to_string(), "stdlib:sys".to_string()]
        );
    }

    #[test]
    fn test_deterministic_rebuild() {
        let modules = vec![
            module(
                "pkg.a",
                vec![
                    import("pkg.b", ImportCategory::Internal),
                    import("flask", ImportCategory::External),
                ],
            ),
            module("pkg.b", vec![import("json", ImportCategory::Stdlib)]),
        ];

        let first = build_graph(&modules, "pkg");
        let second = build_graph(&modules, "pkg");
        assert_eq!(first, second);
    }

    #[test]
    fn test_edge_count() {
        let modules = vec![
            module("pkg.a", vec![import("os", ImportCategory::Stdlib)]),
            module("pkg.b", vec![import("requests", ImportCategory::External)]),
        ];
        let graph = build_graph(&modules, "pkg");
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.module_count(), 2);
    }
}
