//! CLI argument definitions using clap.
//!
//! `transync <PROJECT>` scans the project, then brings every catalog under
//! the output directory up to date.

use std::path::PathBuf;

use clap::Parser;

use crate::config::OutputKind;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Project root directory to scan
    pub project: PathBuf,

    /// Google Cloud Translation API key
    #[arg(long, env = "TRANSYNC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Catalog directory (overrides config file)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Create catalogs for a new language.
    /// Can be specified multiple times: --add-language fr --add-language de
    #[arg(long = "add-language", value_name = "CODE")]
    pub add_languages: Vec<String>,

    /// Write untranslated stubs instead of calling the translation provider
    #[arg(long)]
    pub no_translate: bool,

    /// Generate module catalogs (`<lang>.ts`)
    #[arg(long)]
    pub module: bool,

    /// Generate document catalogs (base document plus `<lang>.json`)
    #[arg(long)]
    pub document: bool,

    /// Print debug logs and full error chains
    #[arg(long)]
    pub debug: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Arguments {
    /// Catalog strategies selected by flags, `None` when no flag was given.
    pub fn output_kinds(&self) -> Option<Vec<OutputKind>> {
        let mut kinds = Vec::new();
        if self.module {
            kinds.push(OutputKind::Module);
        }
        if self.document {
            kinds.push(OutputKind::Document);
        }
        (!kinds.is_empty()).then_some(kinds)
    }
}
