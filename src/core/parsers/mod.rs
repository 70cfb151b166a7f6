//! File parsers for source code and document catalogs.
//!
//! - `source`: TS/TSX/JS/JSX source file parser (uses swc for AST generation)
//! - `json`: flat key/value document parser

pub mod json;
pub mod source;
