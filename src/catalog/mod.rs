//! Catalog synchronization.
//!
//! Both strategies share one contract: entries missing from a catalog are
//! appended, entries already present are never touched, and a file is only
//! written when its content changed or it had to be created.
//!
//! - `module`: `<lang>.ts` source modules
//! - `document`: base document plus `<lang>.json` documents
//! - `identifier`: document identifier derivation
//! - `json_writer`: change-aware JSON persistence

pub mod document;
pub mod identifier;
pub mod json_writer;
pub mod module;

use std::{
    collections::{BTreeSet, HashSet},
    fs,
    path::Path,
};

use anyhow::{Context, Result};

use crate::config::OutputKind;
use crate::core::TemplateRecord;
use crate::issues::{Issue, TranslationFailedIssue, UnsupportedLanguageIssue};
use crate::translate::{TranslationPipeline, TranslationProvider};
use crate::utils::is_language_code;

/// A catalog file that was created or rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate {
    pub path: String,
    /// `None` for the base document.
    pub language: Option<String>,
    pub added: usize,
    /// Added entries left untranslated.
    pub pending: usize,
    pub created: bool,
}

#[derive(Debug, Default)]
pub struct StrategyOutcome {
    pub updates: Vec<FileUpdate>,
    pub issues: Vec<Issue>,
}

/// Result of synchronizing all selected catalogs.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub updates: Vec<FileUpdate>,
    pub issues: Vec<Issue>,
}

impl SyncReport {
    fn absorb(&mut self, outcome: StrategyOutcome) {
        self.updates.extend(outcome.updates);
        self.issues.extend(outcome.issues);
    }

    pub fn pending(&self) -> usize {
        self.updates.iter().map(|u| u.pending).sum()
    }
}

/// Settings for [`sync_catalogs`].
pub struct SyncOptions<'a> {
    pub output_dir: &'a Path,
    pub outputs: &'a [OutputKind],
    pub base_document: &'a str,
    /// Languages requested on the command line or in the config.
    pub requested_languages: &'a [String],
}

fn is_supported(code: &str, supported: &HashSet<String>) -> bool {
    let code = code.to_lowercase();
    if supported.contains(&code) {
        return true;
    }
    code.split(['-', '_'])
        .next()
        .is_some_and(|primary| supported.contains(primary))
}

/// Filter requested languages down to the ones that can be generated.
///
/// Codes that do not look like language codes are always rejected. With a
/// provider, the rest is checked against its supported languages. If that
/// listing fails, the requested languages are accepted unvalidated.
pub async fn validate_requested(
    requested: &[String],
    provider: Option<&dyn TranslationProvider>,
    issues: &mut Vec<Issue>,
) -> Vec<String> {
    let mut candidates = Vec::new();
    for code in requested {
        if candidates.contains(code) {
            continue;
        }
        if is_language_code(code) {
            candidates.push(code.clone());
        } else {
            issues.push(Issue::UnsupportedLanguage(UnsupportedLanguageIssue {
                language: code.clone(),
            }));
        }
    }

    let Some(provider) = provider else {
        return candidates;
    };
    if candidates.is_empty() {
        return candidates;
    }

    match provider.supported_languages().await {
        Ok(supported) => {
            let (accepted, rejected): (Vec<_>, Vec<_>) = candidates
                .into_iter()
                .partition(|code| is_supported(code, &supported));
            for language in rejected {
                issues.push(Issue::UnsupportedLanguage(UnsupportedLanguageIssue { language }));
            }
            accepted
        }
        Err(err) => {
            tracing::debug!(error = %err, "listing supported languages failed");
            issues.push(Issue::TranslationFailed(TranslationFailedIssue {
                language: None,
                text: None,
                error: err.to_string(),
            }));
            candidates
        }
    }
}

/// Languages with an existing catalog file in `dir`.
///
/// A file counts when its extension matches, its stem is a language code and
/// `is_catalog` accepts its content. Other files sharing the directory are
/// left alone.
pub fn discover_languages(
    dir: &Path,
    extension: &str,
    exclude: Option<&str>,
    is_catalog: impl Fn(&Path) -> bool,
) -> Result<BTreeSet<String>> {
    let mut languages = BTreeSet::new();
    if !dir.is_dir() {
        return Ok(languages);
    }

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read catalog directory: {}", dir.display()))?;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let file_name = path.file_name().and_then(|n| n.to_str());
        if file_name.is_some() && file_name == exclude {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if !is_language_code(stem) {
            continue;
        }
        if is_catalog(&path) {
            languages.insert(stem.to_string());
        } else {
            tracing::debug!(path = %path.display(), "not a catalog, ignored");
        }
    }
    Ok(languages)
}

fn target_languages(existing: BTreeSet<String>, accepted: &[String]) -> Vec<String> {
    let mut languages = existing;
    languages.extend(accepted.iter().cloned());
    languages.into_iter().collect()
}

/// Synchronize every selected catalog strategy with the scanned records.
///
/// Requested languages are validated once, before any translation. Provider
/// calls are made one at a time.
pub async fn sync_catalogs(
    records: &[&TemplateRecord],
    options: &SyncOptions<'_>,
    provider: Option<&dyn TranslationProvider>,
) -> Result<SyncReport> {
    let mut report = SyncReport::default();
    let accepted =
        validate_requested(options.requested_languages, provider, &mut report.issues).await;
    let mut pipeline = TranslationPipeline::new(provider);

    for output in options.outputs {
        tracing::debug!(output = %output, "syncing catalogs");
        let outcome = match output {
            OutputKind::Module => {
                let existing = discover_languages(
                    options.output_dir,
                    "ts",
                    None,
                    module::is_module_catalog,
                )?;
                let languages = target_languages(existing, &accepted);
                module::sync_modules(records, options.output_dir, &languages, &mut pipeline).await?
            }
            OutputKind::Document => {
                let existing = discover_languages(
                    options.output_dir,
                    "json",
                    Some(options.base_document),
                    document::is_document_catalog,
                )?;
                let languages = target_languages(existing, &accepted);
                document::sync_documents(
                    records,
                    options.output_dir,
                    options.base_document,
                    &languages,
                    &mut pipeline,
                )
                .await?
            }
        };
        report.absorb(outcome);
    }

    report.issues.extend(pipeline.into_issues());
    Ok(report)
}
