use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

/// Machine translation backend.
///
/// Calls are awaited one at a time; implementations do not need to deal with
/// concurrent requests from the same run.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translate plain text into `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the request fails or the response is unusable.
    async fn translate(&self, text: &str, target: &str) -> Result<String, ProviderError>;

    /// Language codes the provider can translate into.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the listing cannot be fetched.
    async fn supported_languages(&self) -> Result<HashSet<String>, ProviderError>;
}

/// Translation provider failures. None of them abort a run.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Transport(String),
    /// The provider answered with a non-success status.
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// The translated text lost, duplicated, or invented placeholders.
    #[error("placeholder mismatch: {0}")]
    PlaceholderMismatch(String),
}
