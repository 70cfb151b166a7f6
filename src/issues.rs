//! Issue types produced while scanning sources and syncing catalogs.
//!
//! Every issue is self-contained: it carries all the information the CLI
//! reporter needs to render it. None of them abort a run; only configuration
//! errors (plain `anyhow` errors) do.

use enum_dispatch::enum_dispatch;

use crate::core::SourceLocation;

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    ParseError,
    SkippedNode,
    MissingTranslator,
    UnsupportedLanguage,
    DuplicateIdentifier,
    TranslationFailed,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::ParseError => write!(f, "parse-error"),
            Rule::SkippedNode => write!(f, "skipped-node"),
            Rule::MissingTranslator => write!(f, "missing-translator"),
            Rule::UnsupportedLanguage => write!(f, "unsupported-language"),
            Rule::DuplicateIdentifier => write!(f, "duplicate-identifier"),
            Rule::TranslationFailed => write!(f, "translation-failed"),
        }
    }
}

// ============================================================
// Issue Types - Source Code
// ============================================================

/// File could not be parsed and was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

/// A tagged template that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedNodeIssue {
    pub location: SourceLocation,
    pub reason: String,
}

impl SkippedNodeIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::SkippedNode
    }
}

/// No function carries the translator marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTranslatorIssue {
    /// Marker tag that was searched for, without the `@`.
    pub tag: String,
}

impl MissingTranslatorIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::MissingTranslator
    }
}

// ============================================================
// Issue Types - Catalogs
// ============================================================

/// Requested language the provider cannot translate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedLanguageIssue {
    pub language: String,
}

impl UnsupportedLanguageIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::UnsupportedLanguage
    }
}

/// Two different texts map to the same document identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateIdentifierIssue {
    pub identifier: String,
    /// Text kept under the identifier (first seen).
    pub kept_text: String,
    /// Text that was dropped.
    pub dropped_text: String,
    /// Call site of the dropped text.
    pub location: SourceLocation,
}

impl DuplicateIdentifierIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::DuplicateIdentifier
    }
}

/// A provider call failed; the entry was written untranslated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFailedIssue {
    /// Target language, `None` when listing supported languages failed.
    pub language: Option<String>,
    /// Source text, `None` when listing supported languages failed.
    pub text: Option<String>,
    pub error: String,
}

impl TranslationFailedIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::TranslationFailed
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// A diagnostic collected during a run.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    ParseError(ParseErrorIssue),
    SkippedNode(SkippedNodeIssue),
    MissingTranslator(MissingTranslatorIssue),
    UnsupportedLanguage(UnsupportedLanguageIssue),
    DuplicateIdentifier(DuplicateIdentifierIssue),
    TranslationFailed(TranslationFailedIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::ParseError(_) => ParseErrorIssue::severity(),
            Issue::SkippedNode(_) => SkippedNodeIssue::severity(),
            Issue::MissingTranslator(_) => MissingTranslatorIssue::severity(),
            Issue::UnsupportedLanguage(_) => UnsupportedLanguageIssue::severity(),
            Issue::DuplicateIdentifier(_) => DuplicateIdentifierIssue::severity(),
            Issue::TranslationFailed(_) => TranslationFailedIssue::severity(),
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            Issue::ParseError(_) => ParseErrorIssue::rule(),
            Issue::SkippedNode(_) => SkippedNodeIssue::rule(),
            Issue::MissingTranslator(_) => MissingTranslatorIssue::rule(),
            Issue::UnsupportedLanguage(_) => UnsupportedLanguageIssue::rule(),
            Issue::DuplicateIdentifier(_) => DuplicateIdentifierIssue::rule(),
            Issue::TranslationFailed(_) => TranslationFailedIssue::rule(),
        }
    }

    /// Issues only shown with `--verbose`.
    pub fn is_verbose_only(&self) -> bool {
        matches!(self, Issue::SkippedNode(_))
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Position in a source file.
    Source(&'a SourceLocation),
    /// File-level only (no line context).
    File { path: &'a str },
    /// Run-level issue without a location.
    None,
}

/// Trait for types that can be reported to CLI.
///
/// Implemented by all issue types; `enum_dispatch` forwards it through `Issue`.
#[enum_dispatch]
pub trait Report {
    /// Get the location for this issue.
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<String> {
        None
    }

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

impl Report for SkippedNodeIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.location)
    }

    fn message(&self) -> String {
        format!("skipped tagged template: {}", self.reason)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

impl Report for MissingTranslatorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::None
    }

    fn message(&self) -> String {
        format!("no function is marked with @{}", self.tag)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some("every tagged template is treated as translatable".to_string())
    }

    fn hint(&self) -> Option<String> {
        Some(format!(
            "add `/** @{} */` above the declaration of your translator function",
            self.tag
        ))
    }
}

impl Report for UnsupportedLanguageIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::None
    }

    fn message(&self) -> String {
        format!("unsupported language '{}'", self.language)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some("the translation provider does not support it; skipped".to_string())
    }
}

impl Report for DuplicateIdentifierIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.location)
    }

    fn message(&self) -> String {
        self.identifier.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!(
            "kept (\"{}\"), dropped (\"{}\")",
            self.kept_text, self.dropped_text
        ))
    }

    fn hint(&self) -> Option<String> {
        Some("pin a distinct identifier with a `// @word` comment".to_string())
    }
}

impl Report for TranslationFailedIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::None
    }

    fn message(&self) -> String {
        match (&self.language, &self.text) {
            (Some(language), Some(text)) => {
                format!("could not translate \"{}\" to {}", text, language)
            }
            _ => "could not list supported languages".to_string(),
        }
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(self.error.clone())
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Issue {
    /// Get file path for sorting.
    fn sort_file_path(&self) -> Option<&str> {
        match self.location() {
            ReportLocation::Source(loc) => Some(&loc.file_path),
            ReportLocation::File { path } => Some(path),
            ReportLocation::None => None,
        }
    }

    fn sort_line(&self) -> usize {
        match self.location() {
            ReportLocation::Source(loc) => loc.line,
            _ => 0,
        }
    }

    fn sort_col(&self) -> usize {
        match self.location() {
            ReportLocation::Source(loc) => loc.col,
            _ => 0,
        }
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        // Sort by: file_path (None last), line, col, message
        match (self.sort_file_path(), other.sort_file_path()) {
            (Some(a), Some(b)) => a
                .cmp(b)
                .then_with(|| self.sort_line().cmp(&other.sort_line()))
                .then_with(|| self.sort_col().cmp(&other.sort_col()))
                .then_with(|| self.message().cmp(&other.message())),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self
                .rule()
                .cmp(&other.rule())
                .then_with(|| self.message().cmp(&other.message())),
        }
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================
// Tests
// ============================================================
