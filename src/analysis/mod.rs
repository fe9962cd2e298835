// Analysis pipeline: naming, import classification, scanning, graph assembly

pub mod graph;
pub mod imports;
pub mod naming;
pub mod scanner;

pub use graph::*;
pub use imports::*;
pub use naming::*;
pub use scanner::*;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::metadata::{MetadataProvider, PyprojectMetadata};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Result of analyzing one package: the sole artifact handed to a formatter
#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    /// Canonical package name
    pub package_name: String,
    /// Resolved root of the analyzed tree
    pub root_path: PathBuf,
    /// Module records in discovery order
    pub modules: Vec<ModuleRecord>,
    /// Package-wide dependency graph
    pub graph: DependencyGraph,
    /// Opaque metadata from the provider (author, version, license, ...)
    pub metadata: BTreeMap<String, String>,
    /// Files skipped during the scan, with reasons
    pub parse_failures: Vec<ParseFailure>,
}

/// Orchestrates the analysis pipeline
pub struct Analyzer {
    config: Config,
    stdlib: StdlibIndex,
    metadata: Box<dyn MetadataProvider>,
    verbose: bool,
}

impl Analyzer {
    /// Create an analyzer with the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stdlib: StdlibIndex::python_default(),
            metadata: Box::new(PyprojectMetadata),
            verbose: false,
        }
    }

    /// Enable progress output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Use a different standard-library name set
    pub fn with_stdlib_index(mut self, stdlib: StdlibIndex) -> Self {
        self.stdlib = stdlib;
        self
    }

    /// Use a different metadata collaborator
    pub fn with_metadata_provider(mut self, provider: Box<dyn MetadataProvider>) -> Self {
        self.metadata = provider;
        self
    }

    /// Analyze the package at `source_path`.
    ///
    /// Sequencing: validate existence, canonicalize, derive the package name
    /// (sentinel `unknown_package` if derivation fails), scan modules, drop
    /// nameless records, build the graph, attach metadata. Every internal
    /// failure past the existence check collapses into the single
    /// user-facing `NoModulesFound` error; richer detail stays in
    /// `parse_failures` when the run succeeds partially.
    pub fn analyze(&self, source_path: &Path) -> Result<AnalysisResult> {
        if !source_path.exists() {
            return Err(Error::PathNotFound(source_path.to_path_buf()));
        }
        let root = source_path.canonicalize()?;

        let package_name = match naming::derive_package_name(&root) {
            Ok(name) => name,
            Err(e) => {
                if self.verbose {
                    eprintln!("warning: {}; using {:?}", e, FALLBACK_PACKAGE_NAME);
                }
                FALLBACK_PACKAGE_NAME.to_string()
            }
        };

        let mut scanner =
            ModuleScanner::new(&self.config, self.stdlib.clone())?.with_verbose(self.verbose);

        let outcome = scanner.scan(&root, &package_name).map_err(|e| {
            if self.verbose {
                eprintln!("scan failed: {}", e);
            }
            Error::NoModulesFound
        })?;

        let mut modules = outcome.modules;
        let mut failures = outcome.failures;

        modules.retain(|m| {
            if m.name.is_empty() {
                failures.push(ParseFailure {
                    path: m.path.clone(),
                    message: "record has no module name, dropped".to_string(),
                });
                false
            } else {
                true
            }
        });

        if modules.is_empty() {
            return Err(Error::NoModulesFound);
        }

        let graph = build_graph(&modules, &package_name);
        let metadata = self.metadata.get_metadata(&root);

        Ok(AnalysisResult {
            package_name,
            root_path: root,
            modules,
            graph,
            metadata,
            parse_failures: failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::NullMetadata;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_package(name: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join(name);
        let sub = root.join("sub");
        fs::create_dir_all(&sub).unwrap();

        fs::write(root.join("__init__.py"), "").unwrap();
        fs::write(
            root.join("main.py"),
            "import os\nimport requests\nfrom testpkg.sub import worker\n",
        )
        .unwrap();
        fs::write(sub.join("__init__.py"), "").unwrap();
        fs::write(sub.join("worker.py"), "import json\n").unwrap();

        (dir, root)
    }

    fn analyzer() -> Analyzer {
        Analyzer::new(Config::default()).with_metadata_provider(Box::new(NullMetadata))
    }

    #[test]
    fn test_analyze_simple_package() {
        let (_dir, root) = create_test_package("testpkg");
        let result = analyzer().analyze(&root).unwrap();

        assert_eq!(result.package_name, "testpkg");
        assert_eq!(result.modules.len(), 4);
        assert!(result.parse_failures.is_empty());
        assert!(result.graph.external_deps.contains("requests"));
    }

    #[test]
    fn test_package_name_from_versioned_directory() {
        let (_dir, root) = create_test_package("testpkg-1.2.3");
        let result = analyzer().analyze(&root).unwrap();
        assert_eq!(result.package_name, "testpkg");
    }

    #[test]
    fn test_missing_path_is_path_not_found() {
        let result = analyzer().analyze(Path::new("/nonexistent/package"));
        assert!(matches!(result, Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_empty_directory_collapses_to_no_modules_found() {
        let dir = TempDir::new().unwrap();
        let result = analyzer().analyze(dir.path());
        assert!(matches!(result, Err(Error::NoModulesFound)));
        assert_eq!(
            result.unwrap_err().to_string(),
            "No valid modules found"
        );
    }

    #[test]
    fn test_all_parse_failures_collapse_to_no_modules_found() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("badpkg");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("one.py"), "def broken(:\n").unwrap();
        fs::write(root.join("two.py"), "class :\n").unwrap();

        let result = analyzer().analyze(&root);
        assert!(matches!(result, Err(Error::NoModulesFound)));
    }

    #[test]
    fn test_partial_failure_keeps_successes() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("mixedpkg");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("good.py"), "import os\n").unwrap();
        fs::write(root.join("bad.py"), "def broken(:\n").unwrap();

        let result = analyzer().analyze(&root).unwrap();
        assert_eq!(result.modules.len(), 1);
        assert_eq!(result.modules[0].name, "mixedpkg.good");
        assert_eq!(result.parse_failures.len(), 1);
    }

    #[test]
    fn test_graph_keys_match_modules() {
        let (_dir, root) = create_test_package("testpkg");
        let result = analyzer().analyze(&root).unwrap();

        let module_names: std::collections::BTreeSet<&str> =
            result.modules.iter().map(|m| m.name.as_str()).collect();
        let edge_keys: std::collections::BTreeSet<&str> =
            result.graph.edges.keys().map(String::as_str).collect();
        assert_eq!(module_names, edge_keys);
    }

    #[test]
    fn test_module_names_unique() {
        let (_dir, root) = create_test_package("testpkg");
        let result = analyzer().analyze(&root).unwrap();

        let mut names: Vec<&str> = result.modules.iter().map(|m| m.name.as_str()).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_repeat_run_identical_edges() {
        let (_dir, root) = create_test_package("testpkg");
        let first = analyzer().analyze(&root).unwrap();
        let second = analyzer().analyze(&root).unwrap();
        assert_eq!(first.graph, second.graph);
    }

    #[test]
    fn test_metadata_attached_opaquely() {
        let (_dir, root) = create_test_package("testpkg");
        fs::write(
            root.join("pyproject.toml"),
            "[project]\nname = \"testpkg\"\nversion = \"0.3.0\"\n",
        )
        .unwrap();

        let result = Analyzer::new(Config::default()).analyze(&root).unwrap();
        assert_eq!(result.metadata.get("version").map(String::as_str), Some("0.3.0"));
    }
}
