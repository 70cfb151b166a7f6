//! Document catalogs: a base JSON document holding the canonical text of every
//! string plus one flat `<lang>.json` per language.

use std::path::Path;

use anyhow::Result;

use crate::core::TemplateRecord;
use crate::core::parsers::json::load_document;
use crate::issues::{DuplicateIdentifierIssue, Issue};
use crate::translate::{Translation, TranslationPipeline};

use super::identifier::document_identifier;
use super::json_writer::JsonWriter;
use super::{FileUpdate, StrategyOutcome};

/// Whether `path` holds a document catalog, i.e. a JSON object.
pub fn is_document_catalog(path: &Path) -> bool {
    load_document(path).is_ok()
}

fn file_update(writer: &JsonWriter, language: Option<&str>, pending: usize) -> FileUpdate {
    FileUpdate {
        path: writer.path().to_string_lossy().to_string(),
        language: language.map(str::to_string),
        added: writer.added(),
        pending,
        created: !writer.exists(),
    }
}

/// Add every record's canonical text to the base document.
///
/// The first text seen for an identifier wins, whether it was persisted or
/// found earlier in this run. Later conflicting texts are reported.
fn merge_base(records: &[&TemplateRecord], base: &mut JsonWriter, issues: &mut Vec<Issue>) {
    for record in records {
        let Some(identifier) = document_identifier(record) else {
            tracing::debug!(key = record.catalog_key(), "no translatable text, skipped");
            continue;
        };
        let text = record.stripped_key();

        if base.add_if_absent(&identifier, text) {
            continue;
        }
        match base.get_str(&identifier) {
            Some(kept) if kept == text => {}
            kept => issues.push(Issue::DuplicateIdentifier(DuplicateIdentifierIssue {
                identifier: identifier.clone(),
                kept_text: kept.unwrap_or_default().to_string(),
                dropped_text: text.to_string(),
                location: record.location.clone(),
            })),
        }
    }
}

/// Bring the base document and every language document up to date.
pub async fn sync_documents(
    records: &[&TemplateRecord],
    output_dir: &Path,
    base_document: &str,
    languages: &[String],
    pipeline: &mut TranslationPipeline<'_>,
) -> Result<StrategyOutcome> {
    let mut outcome = StrategyOutcome::default();

    let mut base = JsonWriter::open_or_create(&output_dir.join(base_document))?;
    merge_base(records, &mut base, &mut outcome.issues);
    if base.save_if_changed()? {
        tracing::debug!(
            added = base.added(),
            path = %base.path().display(),
            "updated base document"
        );
        outcome.updates.push(file_update(&base, None, 0));
    }

    let base_entries: Vec<(String, String)> = base
        .keys()
        .filter_map(|key| base.get_str(key).map(|text| (key.clone(), text.to_string())))
        .collect();

    for language in languages {
        let mut document =
            JsonWriter::open_or_create(&output_dir.join(format!("{language}.json")))?;
        let pending_before = pipeline.pending();

        for (identifier, text) in &base_entries {
            if document.contains_key(identifier) {
                continue;
            }
            let value = match pipeline.translate(text, language).await {
                Translation::Machine(translated) => translated,
                Translation::Pending => text.clone(),
            };
            document.add_if_absent(identifier, value);
        }

        if document.save_if_changed()? {
            tracing::debug!(
                language = language.as_str(),
                added = document.added(),
                path = %document.path().display(),
                "updated language document"
            );
            outcome.updates.push(file_update(
                &document,
                Some(language),
                pipeline.pending() - pending_before,
            ));
        }
    }

    Ok(outcome)
}
