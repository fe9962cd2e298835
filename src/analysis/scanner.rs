// Module discovery over a package directory
//
// Walks the tree in sorted order so repeated runs discover files
// identically, parses each eligible .py file, and assembles one record per
// file. Per-file failures are collected, never fatal: only a scan that
// produces nothing at all is an error.

use crate::analysis::imports::{analyze_imports, ImportCategory, ImportRecord, StdlibIndex};
use crate::analysis::naming::derive_module_name;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::parser::PythonParser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One analyzed source file (or a package's `__init__.py`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleRecord {
    /// Dotted module name, unique within one analysis
    pub name: String,
    /// Absolute path of the source file
    pub path: PathBuf,
    /// Canonical import records in source order
    pub imports: Vec<ImportRecord>,
    /// Dotted names of internal dependencies
    pub internal_deps: BTreeSet<String>,
    /// Module-level constants by name
    pub constants: BTreeMap<String, ConstantInfo>,
    /// Docstrings keyed by scope id
    pub docstrings: BTreeMap<String, String>,
}

/// Value and type of one module-level constant
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConstantInfo {
    pub value: Option<String>,
    pub type_name: Option<String>,
}

/// A recovered per-file failure (syntax error, unreadable file)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParseFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Everything one scan produced
#[derive(Debug)]
pub struct ScanOutcome {
    /// Records in discovery order
    pub modules: Vec<ModuleRecord>,
    /// Files that were skipped, with the reason
    pub failures: Vec<ParseFailure>,
}

/// Walks a package directory and assembles module records
pub struct ModuleScanner {
    exclude: Vec<glob::Pattern>,
    allow_namespace_packages: bool,
    stdlib: StdlibIndex,
    parser: PythonParser,
    verbose: bool,
}

impl ModuleScanner {
    /// Create a scanner from configuration
    pub fn new(config: &Config, stdlib: StdlibIndex) -> Result<Self> {
        let exclude = config
            .analysis
            .exclude
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            exclude,
            allow_namespace_packages: config.analysis.allow_namespace_packages,
            stdlib,
            parser: PythonParser::new()?,
            verbose: false,
        })
    }

    /// Enable progress output during the scan
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Scan `root`, producing one record per eligible file.
    ///
    /// `__init__.py` files are not swept up as ordinary modules: each yields
    /// exactly one record named after its directory. Fails with
    /// `NoModulesFound` only when the walk turned up nothing parseable and
    /// nothing that even failed to parse.
    pub fn scan(&mut self, root: &Path, package_name: &str) -> Result<ScanOutcome> {
        let files = self.discover_files(root)?;

        let progress = if self.verbose {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut modules = Vec::new();
        let mut failures = Vec::new();
        let mut seen_names: HashSet<String> = HashSet::new();

        for path in &files {
            if let Some(ref pb) = progress {
                let msg = path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string();
                pb.set_message(msg);
                pb.inc(1);
            }

            let relative = path.strip_prefix(root).unwrap_or(path);
            let name = derive_module_name(package_name, relative);

            if !seen_names.insert(name.clone()) {
                failures.push(ParseFailure {
                    path: path.clone(),
                    message: format!("duplicate module name {:?}, skipped", name),
                });
                continue;
            }

            match self.parser.parse_file(path) {
                Ok(parsed) => {
                    let imports = analyze_imports(&parsed, package_name, &self.stdlib);
                    modules.push(ModuleRecord::assemble(name, path.clone(), &parsed, imports));
                }
                Err(e) => {
                    failures.push(ParseFailure {
                        path: path.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("Scan complete");
        }

        if modules.is_empty() && failures.is_empty() {
            return Err(Error::NoModulesFound);
        }

        Ok(ScanOutcome { modules, failures })
    }

    /// Collect eligible .py files in deterministic traversal order
    fn discover_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let root_owned = root.to_path_buf();
        let allow_ns = self.allow_namespace_packages;
        let exclude = self.exclude.clone();

        let walker = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                let path = entry.path();
                if path == root_owned {
                    return true;
                }

                // Hidden components are never descended into
                if entry
                    .file_name()
                    .to_str()
                    .map(|n| n.starts_with('.'))
                    .unwrap_or(false)
                {
                    return false;
                }

                let relative = path.strip_prefix(&root_owned).unwrap_or(path);
                if exclude.iter().any(|p| p.matches_path(relative)) {
                    return false;
                }

                // A subdirectory without __init__.py is only a package if
                // namespace packages are allowed
                if entry.file_type().is_dir()
                    && !allow_ns
                    && !path.join("__init__.py").exists()
                {
                    return false;
                }

                true
            });

        let mut files = Vec::new();
        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            if path.extension().map_or(true, |ext| ext != "py") {
                continue;
            }
            files.push(path.to_path_buf());
        }

        Ok(files)
    }
}

impl ModuleRecord {
    /// Build a record from one file's parse and its classified imports
    fn assemble(
        name: String,
        path: PathBuf,
        parsed: &crate::parser::ParsedFile,
        imports: Vec<ImportRecord>,
    ) -> Self {
        let internal_deps = imports
            .iter()
            .filter(|r| r.kind == ImportCategory::Internal)
            .map(|r| r.full_path.clone())
            .collect();

        let constants = parsed
            .constants
            .iter()
            .map(|c| {
                (
                    c.name.clone(),
                    ConstantInfo {
                        value: c.value.clone(),
                        type_name: c.type_name.clone(),
                    },
                )
            })
            .collect();

        Self {
            name,
            path,
            imports,
            internal_deps,
            constants,
            docstrings: parsed.docstrings.clone(),
        }
    }
}
