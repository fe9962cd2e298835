// Python parser using tree-sitter
//
// Extracts the constructs the analysis pipeline needs from one file:
// imports, module-level constants, and docstrings per scope.

use crate::error::{Error, Result};
use crate::parser::ast::*;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

/// Parser for Python source files
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    /// Create a new Python parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_python::language();
        parser
            .set_language(&language)
            .map_err(|e| Error::Parser(format!("Failed to set Python language: {}", e)))?;
        Ok(Self { parser })
    }

    /// Parse a Python file from disk
    pub fn parse_file(&mut self, path: &Path) -> Result<ParsedFile> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::parse(path, format!("unreadable file: {}", e)))?;
        self.parse_source(&source, path.to_path_buf())
    }

    /// Parse Python source code
    pub fn parse_source(&mut self, source: &str, path: PathBuf) -> Result<ParsedFile> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| Error::parse(path.clone(), "failed to parse source"))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(Error::parse(path, "syntax error"));
        }

        let mut file = ParsedFile::new(path);
        let src = source.as_bytes();

        if let Some(docstring) = extract_block_docstring(&root, src) {
            file.docstrings.insert(MODULE_SCOPE.to_string(), docstring);
        }

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "import_statement" => {
                    if let Some(import) = parse_import(&child, src) {
                        file.imports.push(import);
                    }
                }
                "import_from_statement" => {
                    if let Some(import) = parse_import_from(&child, src) {
                        file.imports.push(import);
                    }
                }
                "class_definition" | "function_definition" | "decorated_definition" => {
                    collect_docstrings(&child, src, None, &mut file.docstrings);
                }
                "expression_statement" => {
                    if let Some(constant) = parse_constant(&child, src) {
                        file.constants.push(constant);
                    }
                }
                _ => {}
            }
        }

        Ok(file)
    }
}

/// Find the docstring of a block: the first expression statement that is a string
fn extract_block_docstring(node: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "expression_statement" {
            let mut inner_cursor = child.walk();
            for inner in child.children(&mut inner_cursor) {
                if inner.kind() == "string" {
                    return extract_string_content(&inner, source);
                }
            }
            return None;
        } else if child.kind() != "comment" {
            // No docstring once a real statement appears
            return None;
        }
    }
    None
}

/// Extract string content, handling triple-quoted strings
fn extract_string_content(node: &Node, source: &[u8]) -> Option<String> {
    let text = node.utf8_text(source).ok()?;

    let s = if text.starts_with("\"\"\"") || text.starts_with("'''") {
        &text[3..text.len().saturating_sub(3)]
    } else if text.starts_with('"') || text.starts_with('\'') {
        &text[1..text.len().saturating_sub(1)]
    } else {
        text
    };

    Some(s.trim().to_string())
}

/// Record the docstring of a class or function under its scope id, recursing
/// into class bodies so methods land under "Class.method"
fn collect_docstrings(
    node: &Node,
    source: &[u8],
    enclosing: Option<&str>,
    out: &mut std::collections::BTreeMap<String, String>,
) {
    // Unwrap decorators to the definition they wrap
    let def = if node.kind() == "decorated_definition" {
        let mut cursor = node.walk();
        let inner = node
            .children(&mut cursor)
            .find(|c| c.kind() == "class_definition" || c.kind() == "function_definition");
        match inner {
            Some(inner) => inner,
            None => return,
        }
    } else {
        *node
    };

    let name = match definition_name(&def, source) {
        Some(n) => n,
        None => return,
    };

    let scope = match enclosing {
        Some(outer) => format!("{}.{}", outer, name),
        None => name.clone(),
    };

    let body = {
        let mut cursor = def.walk();
        let block = def.children(&mut cursor).find(|c| c.kind() == "block");
        block
    };

    if let Some(body) = body {
        if let Some(doc) = extract_block_docstring(&body, source) {
            out.insert(scope.clone(), doc);
        }

        if def.kind() == "class_definition" {
            let mut cursor = body.walk();
            for child in body.children(&mut cursor) {
                if matches!(
                    child.kind(),
                    "function_definition" | "class_definition" | "decorated_definition"
                ) {
                    collect_docstrings(&child, source, Some(&scope), out);
                }
            }
        }
    }
}

/// Get the identifier of a class or function definition
fn definition_name(node: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "identifier" {
            return child.utf8_text(source).ok().map(str::to_string);
        }
    }
    None
}

/// Parse an import statement: `import x` or `import x as y`
fn parse_import(node: &Node, source: &[u8]) -> Option<Import> {
    let line = node.start_position().row + 1;
    let mut names = Vec::new();
    let mut module = String::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "dotted_name" => {
                module = child.utf8_text(source).ok()?.to_string();
                names.push(ImportedName::new(&module));
            }
            "aliased_import" => {
                let mut inner_cursor = child.walk();
                let mut name = String::new();
                let mut alias = None;

                for inner in child.children(&mut inner_cursor) {
                    match inner.kind() {
                        "dotted_name" => {
                            name = inner.utf8_text(source).ok()?.to_string();
                        }
                        "identifier" => {
                            alias = Some(inner.utf8_text(source).ok()?.to_string());
                        }
                        _ => {}
                    }
                }

                if !name.is_empty() {
                    if module.is_empty() {
                        module = name.clone();
                    }
                    if let Some(a) = alias {
                        names.push(ImportedName::with_alias(&name, &a));
                    } else {
                        names.push(ImportedName::new(&name));
                    }
                }
            }
            _ => {}
        }
    }

    if module.is_empty() {
        return None;
    }

    Some(Import {
        module,
        names,
        kind: ImportKind::Direct,
        line,
    })
}

/// Parse an import-from statement: `from x import y`
fn parse_import_from(node: &Node, source: &[u8]) -> Option<Import> {
    let line = node.start_position().row + 1;
    let mut module = String::new();
    let mut names = Vec::new();
    let mut relative_level = 0;
    let mut seen_import_keyword = false;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "relative_import" => {
                // `from ..utils import x` style prefix
                let mut inner_cursor = child.walk();
                for inner in child.children(&mut inner_cursor) {
                    match inner.kind() {
                        "import_prefix" => {
                            relative_level = inner
                                .utf8_text(source)
                                .ok()?
                                .chars()
                                .filter(|c| *c == '.')
                                .count();
                        }
                        "dotted_name" => {
                            module = inner.utf8_text(source).ok()?.to_string();
                        }
                        _ => {}
                    }
                }
            }
            "dotted_name" => {
                let text = child.utf8_text(source).ok()?;
                if !seen_import_keyword {
                    module = text.to_string();
                } else {
                    names.push(ImportedName::new(text));
                }
            }
            "import" => {
                seen_import_keyword = true;
            }
            "wildcard_import" => {
                names.push(ImportedName::new("*"));
            }
            "aliased_import" => {
                let mut inner_cursor = child.walk();
                let mut name = String::new();
                let mut alias = None;

                for inner in child.children(&mut inner_cursor) {
                    match inner.kind() {
                        "identifier" | "dotted_name" => {
                            if name.is_empty() {
                                name = inner.utf8_text(source).ok()?.to_string();
                            } else {
                                alias = Some(inner.utf8_text(source).ok()?.to_string());
                            }
                        }
                        _ => {}
                    }
                }

                if !name.is_empty() {
                    if let Some(a) = alias {
                        names.push(ImportedName::with_alias(&name, &a));
                    } else {
                        names.push(ImportedName::new(&name));
                    }
                }
            }
            _ => {}
        }
    }

    let kind = if relative_level > 0 {
        ImportKind::Relative {
            level: relative_level,
        }
    } else {
        ImportKind::From
    };

    if module.is_empty() && names.is_empty() {
        return None;
    }

    Some(Import {
        module,
        names,
        kind,
        line,
    })
}

/// Infer a Python type name from a literal node kind
fn literal_type_name(kind: &str) -> Option<&'static str> {
    match kind {
        "string" | "concatenated_string" => Some("str"),
        "integer" => Some("int"),
        "float" => Some("float"),
        "true" | "false" => Some("bool"),
        "none" => Some("NoneType"),
        "list" | "list_comprehension" => Some("list"),
        "dictionary" | "dictionary_comprehension" => Some("dict"),
        "tuple" => Some("tuple"),
        "set" | "set_comprehension" => Some("set"),
        _ => None,
    }
}

/// Parse a potential constant assignment (ALL_CAPS names only)
fn parse_constant(node: &Node, source: &[u8]) -> Option<Constant> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "assignment" {
            let line = child.start_position().row + 1;
            let mut inner_cursor = child.walk();
            let mut name = None;
            let mut value = None;
            let mut annotation = None;
            let mut inferred = None;

            for inner in child.children(&mut inner_cursor) {
                match inner.kind() {
                    "identifier" => {
                        let n = inner.utf8_text(source).ok()?;
                        if name.is_none()
                            && n.chars()
                                .all(|c| c.is_uppercase() || c == '_' || c.is_ascii_digit())
                        {
                            name = Some(n.to_string());
                        }
                    }
                    "type" => {
                        annotation = Some(inner.utf8_text(source).ok()?.to_string());
                    }
                    "=" | ":" => {}
                    _ => {
                        if name.is_some() && value.is_none() {
                            value = Some(inner.utf8_text(source).ok()?.to_string());
                            inferred = literal_type_name(inner.kind()).map(str::to_string);
                        }
                    }
                }
            }

            if let Some(n) = name {
                return Some(Constant {
                    name: n,
                    type_name: annotation.or(inferred),
                    value,
                    line,
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(source: &str) -> ParsedFile {
        let mut parser = PythonParser::new().unwrap();
        parser
            .parse_source(source, PathBuf::from("test.py"))
            .unwrap()
    }

    #[test]
    fn test_parser_new() {
        assert!(PythonParser::new().is_ok());
    }

    #[test]
    fn test_empty_file() {
        let file = parse("");
        assert!(file.is_empty());
    }

    #[test]
    fn test_syntax_error_is_parse_failure() {
        let mut parser = PythonParser::new().unwrap();
        let result = parser.parse_source("def broken(:\n", PathBuf::from("bad.py"));
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_module_docstring() {
        let file = parse(r#""""Module docstring.""""#);
        assert_eq!(file.module_docstring(), Some("Module docstring."));
    }

    #[test]
    fn test_simple_import() {
        let file = parse("import os");
        assert_eq!(file.imports.len(), 1);
        assert_eq!(file.imports[0].module, "os");
        assert_eq!(file.imports[0].kind, ImportKind::Direct);
    }

    #[test]
    fn test_import_with_alias() {
        let file = parse("import numpy as np");
        assert_eq!(file.imports.len(), 1);
        assert_eq!(file.imports[0].names.len(), 1);
        assert_eq!(file.imports[0].names[0].used_name(), "np");
    }

    #[test]
    fn test_from_import() {
        let file = parse("from os import path, getcwd");
        assert_eq!(file.imports.len(), 1);
        assert_eq!(file.imports[0].module, "os");
        assert_eq!(file.imports[0].kind, ImportKind::From);
        assert_eq!(file.imports[0].names.len(), 2);
    }

    #[test]
    fn test_from_import_with_alias() {
        let file = parse("from os.path import join as pjoin");
        assert_eq!(file.imports[0].module, "os.path");
        assert_eq!(file.imports[0].names[0].name, "join");
        assert_eq!(file.imports[0].names[0].used_name(), "pjoin");
    }

    #[test]
    fn test_wildcard_import() {
        let file = parse("from os.path import *");
        assert_eq!(file.imports[0].names[0].name, "*");
    }

    #[test]
    fn test_relative_import() {
        let file = parse("from ..utils import helper");
        assert_eq!(file.imports.len(), 1);
        assert_eq!(file.imports[0].module, "utils");
        if let ImportKind::Relative { level } = file.imports[0].kind {
            assert_eq!(level, 2);
        } else {
            panic!("Expected relative import");
        }
    }

    #[test]
    fn test_bare_relative_import() {
        let file = parse("from . import sibling");
        assert_eq!(file.imports.len(), 1);
        assert!(file.imports[0].module.is_empty());
        assert_eq!(file.imports[0].names[0].name, "sibling");
    }

    #[test]
    fn test_function_docstring() {
        let file = parse("def hello():\n    \"\"\"Say hi.\"\"\"\n    pass\n");
        assert_eq!(file.docstrings.get("hello").map(String::as_str), Some("Say hi."));
    }

    #[test]
    fn test_class_and_method_docstrings() {
        let source = r#"
class Widget:
    """A widget."""

    def render(self):
        """Draw it."""
        pass
"#;
        let file = parse(source);
        assert_eq!(file.docstrings.get("Widget").map(String::as_str), Some("A widget."));
        assert_eq!(
            file.docstrings.get("Widget.render").map(String::as_str),
            Some("Draw it.")
        );
    }

    #[test]
    fn test_decorated_function_docstring() {
        let source = "@cache\ndef compute():\n    \"\"\"Cached.\"\"\"\n    pass\n";
        let file = parse(source);
        assert_eq!(file.docstrings.get("compute").map(String::as_str), Some("Cached."));
    }

    #[test]
    fn test_constant_with_inferred_type() {
        let file = parse("MAX_SIZE = 100");
        assert_eq!(file.constants.len(), 1);
        assert_eq!(file.constants[0].name, "MAX_SIZE");
        assert_eq!(file.constants[0].value.as_deref(), Some("100"));
        assert_eq!(file.constants[0].type_name.as_deref(), Some("int"));
    }

    #[test]
    fn test_constant_with_annotation() {
        let file = parse("TIMEOUT: float = 1.5");
        assert_eq!(file.constants[0].type_name.as_deref(), Some("float"));
    }

    #[test]
    fn test_constant_string_type() {
        let file = parse("GREETING = \"hello\"");
        assert_eq!(file.constants[0].type_name.as_deref(), Some("str"));
    }

    #[test]
    fn test_lowercase_assignment_is_not_constant() {
        let file = parse("counter = 0");
        assert!(file.constants.is_empty());
    }

    #[test]
    fn test_zero_byte_init_file() {
        let file = parse("");
        assert!(file.imports.is_empty());
        assert!(file.docstrings.is_empty());
    }
}
