//! transync - keep TypeScript translation catalogs in sync with the source
//!
//! transync finds tagged template literals whose tag is the project's
//! translator function, gives each one a stable key, and appends whatever is
//! missing to the translation catalogs, optionally machine translated. Entries
//! that already exist are never rewritten.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Source scanning and template extraction
//! - `catalog`: Module and document catalog synchronization
//! - `translate`: Translation provider and placeholder protection
//! - `issues`: Issue type definitions and reporting
//! - `utils`: Shared utility functions

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod translate;
pub mod utils;
