// Parser module for extracting syntax records from source files

pub mod ast;
mod python;

pub use ast::*;
pub use python::PythonParser;
