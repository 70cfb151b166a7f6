//! Core extraction engine.
//!
//! ## Pipeline
//!
//! 1. `file_scanner`: find source files under the project root
//! 2. `parsers`: parse them with swc (in parallel)
//! 3. `extract`: resolve the translator function, then turn matching tagged
//!    templates into records
//! 4. `data`: the string table handed to the catalog synchronizer
//!
//! `context` ties the steps together and caches each result.

pub mod context;
pub mod data;
pub mod extract;
pub mod file_scanner;
pub mod parsers;

pub use context::{ScanContext, ScanOutput};
pub use data::{
    InsertOutcome, Notes, ParamType, ParameterDescriptor, SourceLocation, StringTable,
    TemplateRecord,
};
