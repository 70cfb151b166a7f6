use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".transyncrc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.tsx",
    "**/*.test.ts",
    "**/*.test.jsx",
    "**/*.test.js",
    "**/*.spec.tsx",
    "**/*.spec.ts",
    "**/*.spec.jsx",
    "**/*.spec.js",
    "**/__tests__/**",
];

/// Catalog formats that can be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// One `<lang>.ts` source module per language.
    Module,
    /// A base JSON document plus one `<lang>.json` per language.
    Document,
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputKind::Module => write!(f, "module"),
            OutputKind::Document => write!(f, "document"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directories (or glob patterns) to scan. Empty scans the whole project.
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_ignore_test_files")]
    pub ignore_test_files: bool,
    /// Catalog directory, relative to the project root.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Languages to create catalogs for, in addition to the existing ones.
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default = "default_outputs")]
    pub outputs: Vec<OutputKind>,
    /// File name of the base document inside `outputDir`.
    #[serde(default = "default_base_document")]
    pub base_document: String,
    /// Doc comment tag marking the translator function, without the `@`.
    #[serde(default = "default_translator_tag")]
    pub translator_tag: String,
    /// Language of the source strings. Left to the provider's detection when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_ignore_test_files() -> bool {
    true
}

fn default_output_dir() -> String {
    "./i18n".to_string()
}

fn default_outputs() -> Vec<OutputKind> {
    vec![OutputKind::Module]
}

fn default_base_document() -> String {
    "base.json".to_string()
}

fn default_translator_tag() -> String {
    "translator".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: Vec::new(),
            ignores: Vec::new(),
            ignore_test_files: default_ignore_test_files(),
            output_dir: default_output_dir(),
            languages: Vec::new(),
            outputs: default_outputs(),
            base_document: default_base_document(),
            translator_tag: default_translator_tag(),
            source_language: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `ignores` or `includes` is
    /// invalid, or if the output settings cannot produce any catalog.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are literal directory paths.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        if self.outputs.is_empty() {
            bail!("'outputs' must list at least one of \"module\" or \"document\"");
        }
        if self.translator_tag.trim().is_empty() {
            bail!("'translatorTag' must not be empty");
        }
        if self.base_document.trim().is_empty() {
            bail!("'baseDocument' must not be empty");
        }
        if self.request_timeout_secs == 0 {
            bail!("'requestTimeoutSecs' must be greater than 0");
        }

        Ok(())
    }
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
