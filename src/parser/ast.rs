// Syntax-level records extracted from Python source files
//
// These types carry exactly what one file's parse produced. No cross-file
// resolution happens here; classification against a package name is the
// import analyzer's job.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Scope id for a module-level docstring
pub const MODULE_SCOPE: &str = "module";

/// A parsed Python file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedFile {
    /// Path of the source file
    pub path: PathBuf,
    /// All imports in the file, in source order
    pub imports: Vec<Import>,
    /// Module-level ALL_CAPS constants
    pub constants: Vec<Constant>,
    /// Docstrings keyed by scope id: "module", "Class", "func", "Class.method"
    pub docstrings: BTreeMap<String, String>,
}

impl ParsedFile {
    /// Create an empty parsed file
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            imports: Vec::new(),
            constants: Vec::new(),
            docstrings: BTreeMap::new(),
        }
    }

    /// The module-level docstring, if one was present
    pub fn module_docstring(&self) -> Option<&str> {
        self.docstrings.get(MODULE_SCOPE).map(String::as_str)
    }

    /// Check if the file produced any content at all
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.constants.is_empty() && self.docstrings.is_empty()
    }
}

/// An import statement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Import {
    /// The module being imported from (empty for `from . import x`)
    pub module: String,
    /// Names the statement binds; for `import x` this holds the module itself
    pub names: Vec<ImportedName>,
    /// Import kind
    pub kind: ImportKind,
    /// Line number
    pub line: usize,
}

impl Import {
    /// Create a simple `import x` style import
    pub fn simple(module: &str, line: usize) -> Self {
        Self {
            module: module.to_string(),
            names: vec![ImportedName::new(module)],
            kind: ImportKind::Direct,
            line,
        }
    }

    /// Create a `from x import y` style import
    pub fn from_import(module: &str, names: Vec<ImportedName>, line: usize) -> Self {
        Self {
            module: module.to_string(),
            names,
            kind: ImportKind::From,
            line,
        }
    }

    /// Create a relative import
    pub fn relative(module: &str, names: Vec<ImportedName>, level: usize, line: usize) -> Self {
        Self {
            module: module.to_string(),
            names,
            kind: ImportKind::Relative { level },
            line,
        }
    }
}

/// A single imported name with optional alias
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportedName {
    /// Original name
    pub name: String,
    /// Alias (from `as` clause)
    pub alias: Option<String>,
}

impl ImportedName {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: None,
        }
    }

    pub fn with_alias(name: &str, alias: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: Some(alias.to_string()),
        }
    }

    /// Get the name as used in code (alias if present, otherwise original)
    pub fn used_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Kind of import statement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ImportKind {
    /// `import x` or `import x as y`
    Direct,
    /// `from x import y`
    From,
    /// `from . import y` or `from ..x import y`
    Relative { level: usize },
}

impl ImportKind {
    pub fn is_relative(&self) -> bool {
        matches!(self, ImportKind::Relative { .. })
    }
}

/// A module-level constant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Constant {
    /// Constant name (ALL_CAPS by convention)
    pub name: String,
    /// Explicit annotation if present, otherwise the literal's inferred type
    pub type_name: Option<String>,
    /// Value as written in source
    pub value: Option<String>,
    /// Line number
    pub line: usize,
}

impl Constant {
    pub fn new(name: &str, line: usize) -> Self {
        Self {
            name: name.to_string(),
            type_name: None,
            value: None,
            line,
        }
    }

    /// Check if name follows ALL_CAPS convention
    pub fn is_conventional(&self) -> bool {
        self.name
            .chars()
            .all(|c| c.is_uppercase() || c == '_' || c.is_ascii_digit())
    }
}
