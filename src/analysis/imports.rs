// Import classification against a known package name
//
// Turns syntax-level import statements into canonical records tagged
// internal / stdlib / external. Purely derived from syntax: nothing here
// touches the filesystem or resolves names across files.

use crate::parser::{ImportKind, ParsedFile};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Classification of an import relative to the analyzed package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportCategory {
    /// Python standard library module
    Stdlib,
    /// Module within the analyzed package
    Internal,
    /// Anything else (third-party)
    External,
}

/// A canonical import record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    /// Full dotted path as written (`os.path.join` for `from os.path import join`)
    pub full_path: String,
    /// Name the import binds locally (alias if present)
    pub local_name: String,
    /// Classification
    pub kind: ImportCategory,
    /// First dotted segment of the full path
    pub source_root: String,
}

/// An injected, immutable set of standard-library module names.
///
/// Kept as a value rather than a process-wide constant so separate analyses
/// can target different interpreter versions. The default is a curated static
/// list of Python 3.10+ top-level modules; names absent from the list
/// classify as external, which is a known limitation of the static approach.
#[derive(Debug, Clone)]
pub struct StdlibIndex {
    names: HashSet<String>,
}

impl StdlibIndex {
    /// Build an index from any collection of module names
    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    /// The curated Python 3.10+ top-level stdlib module list
    pub fn python_default() -> Self {
        let stdlib = [
            "abc", "aifc", "argparse", "array", "ast", "asynchat", "asyncio",
            "asyncore", "atexit", "audioop", "base64", "bdb", "binascii",
            "binhex", "bisect", "builtins", "bz2", "calendar", "cgi", "cgitb",
            "chunk", "cmath", "cmd", "code", "codecs", "codeop", "collections",
            "colorsys", "compileall", "concurrent", "configparser", "contextlib",
            "contextvars", "copy", "copyreg", "cProfile", "crypt", "csv",
            "ctypes", "curses", "dataclasses", "datetime", "dbm", "decimal",
            "difflib", "dis", "distutils", "doctest", "email", "encodings",
            "enum", "errno", "faulthandler", "fcntl", "filecmp", "fileinput",
            "fnmatch", "fractions", "ftplib", "functools", "gc", "getopt",
            "getpass", "gettext", "glob", "graphlib", "grp", "gzip", "hashlib",
            "heapq", "hmac", "html", "http", "idlelib", "imaplib", "imghdr",
            "imp", "importlib", "inspect", "io", "ipaddress", "itertools",
            "json", "keyword", "lib2to3", "linecache", "locale", "logging",
            "lzma", "mailbox", "mailcap", "marshal", "math", "mimetypes",
            "mmap", "modulefinder", "multiprocessing", "netrc", "nis",
            "nntplib", "numbers", "operator", "optparse", "os", "ossaudiodev",
            "pathlib", "pdb", "pickle", "pickletools", "pipes", "pkgutil",
            "platform", "plistlib", "poplib", "posix", "posixpath", "pprint",
            "profile", "pstats", "pty", "pwd", "py_compile", "pyclbr",
            "pydoc", "queue", "quopri", "random", "re", "readline", "reprlib",
            "resource", "rlcompleter", "runpy", "sched", "secrets", "select",
            "selectors", "shelve", "shlex", "shutil", "signal", "site",
            "smtpd", "smtplib", "sndhdr", "socket", "socketserver", "spwd",
            "sqlite3", "ssl", "stat", "statistics", "string", "stringprep",
            "struct", "subprocess", "sunau", "symtable", "sys", "sysconfig",
            "syslog", "tabnanny", "tarfile", "telnetlib", "tempfile", "termios",
            "test", "textwrap", "threading", "time", "timeit", "tkinter",
            "token", "tokenize", "tomllib", "trace", "traceback", "tracemalloc",
            "tty", "turtle", "turtledemo", "types", "typing", "unicodedata",
            "unittest", "urllib", "uu", "uuid", "venv", "warnings", "wave",
            "weakref", "webbrowser", "winreg", "winsound", "wsgiref", "xdrlib",
            "xml", "xmlrpc", "zipapp", "zipfile", "zipimport", "zlib",
            "_thread", "__future__",
        ];
        Self::from_names(stdlib.iter().map(|s| s.to_string()))
    }

    /// Check membership of a top-level module name
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for StdlibIndex {
    fn default() -> Self {
        Self::python_default()
    }
}

/// Extract every import in a parsed file as a canonical record.
///
/// `import X` yields full path `X`; `from M import X` yields `M.X`, or just
/// `X` when `M` is empty. Relative import levels are not resolved against the
/// importing module's position: the partial module string syntax provides is
/// recorded as-is, so callers needing exact resolution must combine the
/// record with the importing module's own dotted name.
pub fn analyze_imports(
    parsed: &ParsedFile,
    package_name: &str,
    stdlib: &StdlibIndex,
) -> Vec<ImportRecord> {
    let mut records = Vec::new();

    for import in &parsed.imports {
        match import.kind {
            ImportKind::Direct => {
                for name in &import.names {
                    records.push(make_record(
                        name.name.clone(),
                        name.used_name().to_string(),
                        package_name,
                        stdlib,
                    ));
                }
            }
            ImportKind::From | ImportKind::Relative { .. } => {
                for name in &import.names {
                    let full_path = if import.module.is_empty() {
                        name.name.clone()
                    } else {
                        format!("{}.{}", import.module, name.name)
                    };
                    records.push(make_record(
                        full_path,
                        name.used_name().to_string(),
                        package_name,
                        stdlib,
                    ));
                }
            }
        }
    }

    records
}

fn make_record(
    full_path: String,
    local_name: String,
    package_name: &str,
    stdlib: &StdlibIndex,
) -> ImportRecord {
    let source_root = full_path
        .split('.')
        .next()
        .unwrap_or(full_path.as_str())
        .to_string();
    let kind = classify(&full_path, &source_root, package_name, stdlib);

    ImportRecord {
        full_path,
        local_name,
        kind,
        source_root,
    }
}

/// First match wins: internal, then stdlib, then external
fn classify(
    full_path: &str,
    source_root: &str,
    package_name: &str,
    stdlib: &StdlibIndex,
) -> ImportCategory {
    if source_root == package_name || full_path.starts_with(&format!("{}.", package_name)) {
        ImportCategory::Internal
    } else if stdlib.contains(source_root) {
        ImportCategory::Stdlib
    } else {
        ImportCategory::External
    }
}
