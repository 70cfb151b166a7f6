//! Core data types shared by the scan and sync phases.
//!
//! ## Module Structure
//!
//! - `source`: Source code location type (SourceLocation)
//! - `template`: Template records and parameter descriptors
//! - `string_table`: Run-scoped, deduplicating table of template records

pub mod source;
pub mod string_table;
pub mod template;

pub use source::SourceLocation;
pub use string_table::{InsertOutcome, StringTable};
pub use template::{Notes, ParamType, ParameterDescriptor, TemplateRecord};
