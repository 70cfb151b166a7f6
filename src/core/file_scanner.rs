use std::{
    collections::BTreeSet,
    fmt,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::{Pattern, glob};
use walkdir::WalkDir;

use crate::config::TEST_FILE_PATTERNS;
use crate::utils::normalize_path;

/// Directory names that are never scanned.
const ALWAYS_SKIPPED_DIRS: &[&str] = &["node_modules", ".git"];

/// Patterns without `*` or `?` name literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning files.
pub struct FileScanResult {
    /// Matching source files, sorted by path.
    pub files: BTreeSet<String>,
    /// Entries that could not be read.
    pub skipped_count: usize,
}

/// Options for [`scan_files`].
pub struct FileScanOptions<'a> {
    pub base_dir: &'a str,
    pub includes: &'a [String],
    pub ignores: &'a [String],
    pub ignore_test_files: bool,
    /// Directories excluded regardless of includes (e.g. the catalog output directory).
    pub excluded_dirs: &'a [PathBuf],
    pub verbose: bool,
}

fn warn(verbose: bool, message: fmt::Arguments<'_>) {
    if verbose {
        eprintln!("{} {}", "warning:".bold().yellow(), message);
    }
}

/// Ignore settings resolved against the base directory.
struct IgnoreRules {
    /// Literal ignores, matched as path prefixes.
    prefixes: Vec<PathBuf>,
    globs: Vec<Pattern>,
}

impl IgnoreRules {
    fn new(options: &FileScanOptions<'_>) -> Self {
        let base = Path::new(options.base_dir);
        let mut rules = Self {
            prefixes: Vec::new(),
            globs: Vec::new(),
        };

        for ignore in options.ignores {
            if !is_glob_pattern(ignore) {
                rules.prefixes.push(base.join(ignore));
                continue;
            }
            match Pattern::new(ignore) {
                Ok(pattern) => rules.globs.push(pattern),
                Err(err) => warn(
                    options.verbose,
                    format_args!("Invalid ignore pattern '{ignore}': {err}"),
                ),
            }
        }
        if options.ignore_test_files {
            rules
                .globs
                .extend(TEST_FILE_PATTERNS.iter().filter_map(|p| Pattern::new(p).ok()));
        }
        rules
    }

    fn is_ignored(&self, path: &Path) -> bool {
        if self.prefixes.iter().any(|prefix| path.starts_with(prefix)) {
            return true;
        }
        let path = path.to_string_lossy();
        self.globs.iter().any(|pattern| pattern.matches(&path))
    }
}

fn is_skipped_dir(path: &Path, excluded_dirs: &[PathBuf]) -> bool {
    let by_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| ALWAYS_SKIPPED_DIRS.contains(&name));
    if by_name {
        return true;
    }
    let path = normalize_path(path);
    excluded_dirs
        .iter()
        .any(|dir| path.starts_with(normalize_path(dir)))
}

/// Directories to walk: the base directory, or whatever the includes name.
fn scan_roots(options: &FileScanOptions<'_>) -> Vec<PathBuf> {
    let base = Path::new(options.base_dir);
    if options.includes.is_empty() {
        return vec![base.to_path_buf()];
    }

    let mut roots = Vec::new();
    for include in options.includes {
        let path = base.join(include);
        if !is_glob_pattern(include) {
            if path.exists() {
                roots.push(path);
            } else {
                warn(
                    options.verbose,
                    format_args!("Include path does not exist: {}", path.display()),
                );
            }
            continue;
        }
        match glob(&path.to_string_lossy()) {
            Ok(matches) => roots.extend(matches.flatten().filter(|entry| entry.is_dir())),
            Err(err) => warn(
                options.verbose,
                format_args!("Invalid glob pattern '{include}': {err}"),
            ),
        }
    }
    roots
}

/// Collect every scannable source file under the scan roots.
///
/// Overlapping roots are fine: the result is a set.
pub fn scan_files(options: &FileScanOptions<'_>) -> FileScanResult {
    let rules = IgnoreRules::new(options);
    let mut result = FileScanResult {
        files: BTreeSet::new(),
        skipped_count: 0,
    };

    for root in scan_roots(options) {
        let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
            !(entry.file_type().is_dir() && is_skipped_dir(entry.path(), options.excluded_dirs))
        });
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    result.skipped_count += 1;
                    warn(options.verbose, format_args!("Cannot access path: {err}"));
                    continue;
                }
            };
            let path = entry.path();
            if path.is_file() && is_scannable_file(path) && !rules.is_ignored(path) {
                result.files.insert(path.to_string_lossy().into_owned());
            }
        }
    }

    tracing::debug!(
        count = result.files.len(),
        skipped = result.skipped_count,
        "scanned source files"
    );
    result
}

fn is_scannable_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("tsx" | "ts" | "jsx" | "js" | "mts" | "cts")
    ) && !path.to_string_lossy().ends_with(".d.ts")
}
