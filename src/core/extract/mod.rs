//! Template extraction: from a parsed file to template records.
//!
//! The scanner walks each module once. Along the way it keeps a lexical scope
//! stack so slot identifiers resolve to their declarations and the tag of
//! each tagged template can be checked against the designated translator.

pub mod canonical;
pub mod node;
pub mod notes;
pub mod params;
pub mod scanner;
pub mod scope;
pub mod translator_fn;
pub mod types;

pub use canonical::{Skeleton, canonical_key, strip_template_quotes};
pub use node::NodeKind;
pub use scanner::{ScanResult, TemplateScanner};
pub use translator_fn::{TranslatorTarget, find_translator, resolve_import_path};
