//! Common utility functions shared across the codebase.

use std::path::{Component, Path, PathBuf};

/// Checks if the text contains a run of at least two consecutive alphabetic
/// characters.
///
/// Single letters (`x`, `a`) do not count as translatable content.
///
/// # Examples
///
/// ```
/// use transync::utils::has_alphabetic_run;
///
/// assert!(has_alphabetic_run("Hello"));
/// assert!(has_alphabetic_run("你好"));
/// assert!(has_alphabetic_run("${0} items"));
/// assert!(!has_alphabetic_run("${0}: ${1}"));
/// assert!(!has_alphabetic_run("x = 1"));
/// assert!(!has_alphabetic_run(""));
/// ```
pub fn has_alphabetic_run(text: &str) -> bool {
    let mut run = 0;
    for c in text.chars() {
        if c.is_alphabetic() {
            run += 1;
            if run >= 2 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Checks whether a file stem looks like a language code (`fr`, `pt-BR`, `zh-Hant-TW`).
pub fn is_language_code(code: &str) -> bool {
    let mut parts = code.split(['-', '_']);
    let Some(primary) = parts.next() else {
        return false;
    };
    if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_lowercase()) {
        return false;
    }
    parts.all(|part| {
        (2..=8).contains(&part.len()) && part.chars().all(|c| c.is_ascii_alphanumeric())
    })
}

/// Lexically normalize a path, resolving `.` and `..` without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Plural-aware noun for summary lines.
pub fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::*;

    #[test]
    fn test_has_alphabetic_run() {
        assert!(has_alphabetic_run("Hello"));
        assert!(has_alphabetic_run("Total: ${0}"));
        assert!(has_alphabetic_run("  ok  "));

        assert!(!has_alphabetic_run("${0}"));
        assert!(!has_alphabetic_run("${0} - ${1}"));
        assert!(!has_alphabetic_run("a.b.c"));
        assert!(!has_alphabetic_run("123-456"));
        assert!(!has_alphabetic_run("   "));
    }

    #[test]
    fn test_is_language_code() {
        assert!(is_language_code("fr"));
        assert!(is_language_code("pt-BR"));
        assert!(is_language_code("zh-Hant"));
        assert!(is_language_code("fil"));

        assert!(!is_language_code("index"));
        assert!(!is_language_code("base"));
        assert!(!is_language_code("FR"));
        assert!(!is_language_code("f"));
        assert!(!is_language_code(""));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path(Path::new("proj/src/components/../i18n.ts")),
            PathBuf::from("proj/src/i18n.ts")
        );
        assert_eq!(
            normalize_path(Path::new("./proj/./src/a.ts")),
            PathBuf::from("proj/src/a.ts")
        );
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "file", "files"), "1 file");
        assert_eq!(plural(0, "file", "files"), "0 files");
    }
}
