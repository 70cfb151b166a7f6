//! Machine translation of missing catalog entries.
//!
//! - `provider`: the provider trait and its error type
//! - `google`: Google Cloud Translation implementation
//! - `placeholder`: `${...}` protection around provider calls
//! - `pipeline`: sequential round trip with pending fallback

pub mod google;
pub mod pipeline;
pub mod placeholder;
pub mod provider;

pub use google::GoogleTranslator;
pub use pipeline::{Translation, TranslationPipeline};
pub use provider::{ProviderError, TranslationProvider};
