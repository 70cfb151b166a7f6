use std::{
    cell::OnceCell,
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Result, anyhow, bail};
use rayon::prelude::*;

use crate::{
    cli::args::Arguments,
    config::{Config, load_config},
    core::{
        InsertOutcome, StringTable,
        extract::{TemplateScanner, TranslatorTarget, find_translator},
        file_scanner::{FileScanOptions, scan_files},
        parsers::source::{ParsedSource, parse_source},
    },
    issues::{Issue, MissingTranslatorIssue, ParseErrorIssue},
    utils::normalize_path,
};

/// Everything the scan phase produced.
pub struct ScanOutput {
    /// Distinct records in first-seen order.
    pub table: StringTable,
    /// The designated translator, `None` when no function carries the marker.
    pub target: Option<TranslatorTarget>,
    /// Scan diagnostics (parse errors, skipped nodes, missing translator).
    pub issues: Vec<Issue>,
}

/// Run context: merged configuration, the source file set, and the lazily
/// computed parse and scan results.
///
/// Configuration priority (highest to lowest):
/// 1. CLI arguments (e.g. `--output`, `--add-language`)
/// 2. `.transyncrc.json` config file
/// 3. Built-in defaults
pub struct ScanContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    pub root_dir: PathBuf,

    /// Catalog directory, resolved against the project root.
    pub output_dir: PathBuf,

    /// Source files to scan, sorted by path.
    pub files: Vec<String>,

    /// Languages requested on the command line and in the config.
    pub requested_languages: Vec<String>,

    pub verbose: bool,

    parsed_files: OnceCell<BTreeMap<String, ParsedSource>>,
    parsed_files_errors: OnceCell<Vec<ParseErrorIssue>>,
    scan: OnceCell<ScanOutput>,
}

fn resolve_against(root_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        normalize_path(&root_dir.join(path))
    }
}

impl ScanContext {
    /// Create a context from command line arguments.
    ///
    /// # Errors
    ///
    /// Returns error if the project root is missing or the config file is invalid.
    pub fn new(args: &Arguments) -> Result<Self> {
        let verbose = args.verbose;
        let root_dir = args.project.clone();
        if !root_dir.is_dir() {
            bail!("Project root does not exist: {}", root_dir.display());
        }
        let base_dir = root_dir
            .to_str()
            .ok_or_else(|| anyhow!("Invalid path: {:?}", root_dir))?;

        let config_result = load_config(&root_dir)?;
        if verbose && !config_result.from_file {
            eprintln!("Note: No .transyncrc.json found, using default configuration");
        }
        let mut config = config_result.config;

        if let Some(output) = &args.output {
            config.output_dir = output.to_string_lossy().to_string();
        }
        if let Some(outputs) = args.output_kinds() {
            config.outputs = outputs;
        }

        let mut requested_languages = config.languages.clone();
        for language in &args.add_languages {
            if !requested_languages.contains(language) {
                requested_languages.push(language.clone());
            }
        }

        let output_dir = resolve_against(&root_dir, Path::new(&config.output_dir));
        let excluded_dirs = [output_dir.clone()];
        let scan_result = scan_files(&FileScanOptions {
            base_dir,
            includes: &config.includes,
            ignores: &config.ignores,
            ignore_test_files: config.ignore_test_files,
            excluded_dirs: &excluded_dirs,
            verbose,
        });

        if scan_result.skipped_count > 0 {
            eprintln!(
                "Warning: {} path(s) skipped due to access errors{}",
                scan_result.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        Ok(Self {
            config,
            root_dir,
            output_dir,
            files: scan_result.files.into_iter().collect(),
            requested_languages,
            verbose,
            parsed_files: OnceCell::new(),
            parsed_files_errors: OnceCell::new(),
            scan: OnceCell::new(),
        })
    }

    /// Parsed AST for all source files (lazy initialization).
    ///
    /// Reading and parsing run in parallel; each file gets its own SourceMap.
    /// Files that fail are left out and reported by `parsed_files_errors()`.
    pub fn parsed_files(&self) -> &BTreeMap<String, ParsedSource> {
        self.parsed_files.get_or_init(|| {
            let parse_results: Vec<_> = self
                .files
                .par_iter()
                .map(|file_path| {
                    let parse_result = std::fs::read_to_string(file_path)
                        .map_err(|e| anyhow!("Failed to read file: {}", e))
                        .and_then(|code| {
                            let source_map = Arc::new(swc_common::SourceMap::default());
                            parse_source(code, file_path, source_map)
                        });
                    (file_path.clone(), parse_result)
                })
                .collect();

            let mut parsed = BTreeMap::new();
            let mut errors = Vec::new();

            for (file_path, result) in parse_results {
                match result {
                    Ok(p) => {
                        parsed.insert(file_path, p);
                    }
                    Err(e) => {
                        if self.verbose {
                            eprintln!("Warning: {} - {}", file_path, e);
                        }
                        errors.push(ParseErrorIssue {
                            file_path,
                            error: e.to_string(),
                        });
                    }
                }
            }

            tracing::debug!(parsed = parsed.len(), failed = errors.len(), "parsed source files");
            let _ = self.parsed_files_errors.set(errors);
            parsed
        })
    }

    /// Parse errors from source files. Populated when `parsed_files()` is first called.
    pub fn parsed_files_errors(&self) -> &Vec<ParseErrorIssue> {
        self.parsed_files_errors.get_or_init(Vec::new)
    }

    /// Resolve the designated translator, then scan every file in sorted path
    /// order into the string table (lazy initialization).
    pub fn scan(&self) -> &ScanOutput {
        self.scan.get_or_init(|| {
            let parsed = self.parsed_files();
            let mut issues: Vec<Issue> = self
                .parsed_files_errors()
                .iter()
                .cloned()
                .map(Issue::ParseError)
                .collect();

            let known_files: HashSet<PathBuf> = parsed
                .keys()
                .map(|file_path| normalize_path(Path::new(file_path)))
                .collect();

            let tag = &self.config.translator_tag;
            let target = find_translator(
                parsed.iter().map(|(path, source)| (path.as_str(), source)),
                tag,
            );
            match &target {
                Some(target) => tracing::debug!(
                    name = target.name.as_str(),
                    file = %target.file_path.display(),
                    "found translator function"
                ),
                None => issues.push(Issue::MissingTranslator(MissingTranslatorIssue {
                    tag: tag.clone(),
                })),
            }

            let mut table = StringTable::new();
            let mut merged = 0;
            for (file_path, source) in parsed {
                let result =
                    TemplateScanner::new(file_path, source, target.as_ref(), &known_files).scan();
                tracing::debug!(
                    file = file_path.as_str(),
                    records = result.records.len(),
                    skipped = result.skipped.len(),
                    "scanned file"
                );
                for record in result.records {
                    if table.insert(record) == InsertOutcome::Merged {
                        merged += 1;
                    }
                }
                issues.extend(result.skipped.into_iter().map(Issue::SkippedNode));
            }
            tracing::debug!(records = table.len(), merged, "built string table");

            ScanOutput {
                table,
                target,
                issues,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::config::OutputKind;

    fn args(root: &Path, extra: &[&str]) -> Arguments {
        let mut argv = vec!["transync".to_string(), root.to_string_lossy().to_string()];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Arguments::try_parse_from(argv).unwrap()
    }

    fn project() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        dir
    }

    #[test]
    fn test_missing_project_root() {
        let dir = tempdir().unwrap();
        let result = ScanContext::new(&args(&dir.path().join("nope"), &[]));
        assert!(result.err().unwrap().to_string().contains("does not exist"));
    }

    #[test]
    fn test_cli_overrides_config() {
        let dir = project();
        fs::write(
            dir.path().join(".transyncrc.json"),
            r#"{ "outputDir": "./locales", "languages": ["fr"], "outputs": ["module"] }"#,
        )
        .unwrap();

        let ctx = ScanContext::new(&args(
            dir.path(),
            &["-o", "out", "--add-language", "de", "--add-language", "fr", "--document"],
        ))
        .unwrap();

        assert_eq!(ctx.config.output_dir, "out");
        assert_eq!(ctx.output_dir, normalize_path(&dir.path().join("out")));
        assert_eq!(ctx.config.outputs, vec![OutputKind::Document]);
        assert_eq!(ctx.requested_languages, vec!["fr", "de"]);
    }

    #[test]
    fn test_output_dir_is_not_scanned() {
        let dir = project();
        fs::write(dir.path().join("src/app.ts"), "t`Hello`;").unwrap();
        fs::create_dir(dir.path().join("i18n")).unwrap();
        fs::write(dir.path().join("i18n/fr.ts"), "export default {};").unwrap();

        let ctx = ScanContext::new(&args(dir.path(), &[])).unwrap();
        assert_eq!(ctx.files.len(), 1);
        assert!(ctx.files[0].ends_with("app.ts"));
    }

    #[test]
    fn test_scan_with_translator_function() {
        let dir = project();
        fs::write(
            dir.path().join("src/i18n.ts"),
            "/** @translator */\nexport function t(strings: TemplateStringsArray, ...values: unknown[]): string { return ''; }\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("src/app.ts"),
            "import { t } from './i18n';\nimport { other } from './other';\nconst count: number = 2;\nt`Total: ${count}`;\nother`Ignored`;\n",
        )
        .unwrap();

        let ctx = ScanContext::new(&args(dir.path(), &[])).unwrap();
        let output = ctx.scan();

        assert!(output.target.is_some());
        assert!(output.issues.is_empty());
        let keys: Vec<&str> = output.table.iter().map(|r| r.catalog_key()).collect();
        assert_eq!(keys, vec!["`Total: ${0}`"]);
    }

    #[test]
    fn test_scan_without_translator_warns_and_accepts_all() {
        let dir = project();
        fs::write(dir.path().join("src/app.ts"), "a`Hello`;\nb`World`;\n").unwrap();

        let ctx = ScanContext::new(&args(dir.path(), &[])).unwrap();
        let output = ctx.scan();

        assert!(output.target.is_none());
        assert!(matches!(output.issues[0], Issue::MissingTranslator(_)));
        assert_eq!(output.table.len(), 2);
    }

    #[test]
    fn test_parse_errors_are_reported() {
        let dir = project();
        fs::write(dir.path().join("src/broken.ts"), "const = ;").unwrap();
        fs::write(dir.path().join("src/app.ts"), "t`Hello`;").unwrap();

        let ctx = ScanContext::new(&args(dir.path(), &[])).unwrap();
        let output = ctx.scan();

        assert_eq!(output.table.len(), 1);
        assert!(
            output
                .issues
                .iter()
                .any(|i| matches!(i, Issue::ParseError(e) if e.file_path.ends_with("broken.ts")))
        );
    }
}
