//! Surveyor - Analyze Python package structure and dependencies
//!
//! Walks a Python source tree, derives canonical module names, classifies
//! every import as internal/stdlib/external, and assembles a whole-package
//! dependency graph for a downstream documentation formatter.

pub mod analysis;
pub mod config;
pub mod error;
pub mod metadata;
pub mod parser;

// Re-export main types
pub use analysis::{
    build_graph, derive_module_name, derive_package_name, AnalysisResult, Analyzer, ConstantInfo,
    DependencyGraph, ImportCategory, ImportRecord, ModuleRecord, ModuleScanner, ParseFailure,
    ScanOutcome, StdlibIndex,
};
pub use config::Config;
pub use error::{Error, Result};
pub use metadata::{MetadataProvider, NullMetadata, PyprojectMetadata};
