use crate::issues::{Issue, TranslationFailedIssue};

use super::{
    placeholder::{protect, restore},
    provider::{ProviderError, TranslationProvider},
};

/// Outcome of translating one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// Provider output with placeholders restored.
    Machine(String),
    /// No provider, or the provider failed. The entry keeps the source text.
    Pending,
}

/// Runs the protect → translate → restore round trip for missing entries.
///
/// Calls are awaited one after another. Failures never propagate: they are
/// recorded as issues and the entry is reported as pending.
pub struct TranslationPipeline<'a> {
    provider: Option<&'a dyn TranslationProvider>,
    issues: Vec<Issue>,
    pending: usize,
}

impl<'a> TranslationPipeline<'a> {
    pub fn new(provider: Option<&'a dyn TranslationProvider>) -> Self {
        Self {
            provider,
            issues: Vec::new(),
            pending: 0,
        }
    }

    pub async fn translate(&mut self, text: &str, language: &str) -> Translation {
        let Some(provider) = self.provider else {
            self.pending += 1;
            return Translation::Pending;
        };

        match Self::round_trip(provider, text, language).await {
            Ok(translated) => Translation::Machine(translated),
            Err(err) => {
                tracing::debug!(language, text, error = %err, "translation failed");
                self.issues.push(Issue::TranslationFailed(TranslationFailedIssue {
                    language: Some(language.to_string()),
                    text: Some(text.to_string()),
                    error: err.to_string(),
                }));
                self.pending += 1;
                Translation::Pending
            }
        }
    }

    async fn round_trip(
        provider: &dyn TranslationProvider,
        text: &str,
        language: &str,
    ) -> Result<String, ProviderError> {
        let protected = protect(text);
        let translated = provider.translate(&protected.text, language).await?;
        restore(&translated, &protected.spans)
    }

    /// Entries left untranslated so far.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}
