//! One invocation: scan the project, then sync every selected catalog.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use super::args::Arguments;
use crate::catalog::{FileUpdate, SyncOptions, sync_catalogs};
use crate::config::Config;
use crate::core::{ScanContext, TemplateRecord};
use crate::issues::Issue;
use crate::translate::{GoogleTranslator, TranslationProvider};

/// What a run did, ready for reporting.
pub struct RunOutcome {
    pub issues: Vec<Issue>,
    pub updates: Vec<FileUpdate>,
    pub source_files: usize,
    pub records: usize,
}

/// Build the translation provider, unless translation was turned off.
fn provider(args: &Arguments, config: &Config) -> Result<Option<GoogleTranslator>> {
    if args.no_translate {
        return Ok(None);
    }
    let api_key = args
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            anyhow!("Missing API key: use --api-key, TRANSYNC_API_KEY, or --no-translate")
        })?;
    let translator = GoogleTranslator::new(
        api_key,
        config.source_language.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("Failed to create translation client")?;
    Ok(Some(translator))
}

pub fn run(args: &Arguments) -> Result<RunOutcome> {
    let ctx = ScanContext::new(args)?;
    let provider = provider(args, &ctx.config)?;

    let scan = ctx.scan();
    let records: Vec<&TemplateRecord> = scan.table.iter().collect();
    tracing::debug!(
        files = ctx.files.len(),
        records = records.len(),
        "scan complete"
    );

    let options = SyncOptions {
        output_dir: &ctx.output_dir,
        outputs: &ctx.config.outputs,
        base_document: &ctx.config.base_document,
        requested_languages: &ctx.requested_languages,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let report = runtime.block_on(sync_catalogs(
        &records,
        &options,
        provider.as_ref().map(|p| p as &dyn TranslationProvider),
    ))?;

    let mut issues = scan.issues.clone();
    issues.extend(report.issues);

    Ok(RunOutcome {
        issues,
        updates: report.updates,
        source_files: ctx.files.len(),
        records: records.len(),
    })
}
