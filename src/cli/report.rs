//! Report formatting and printing utilities.
//!
//! Issues are displayed in cargo-style format, followed by the list of
//! catalog files that were written and a summary count.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::run::RunOutcome;
use crate::catalog::FileUpdate;
use crate::issues::{Issue, Report, ReportLocation, Severity};
use crate::utils::plural;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to stdout.
///
/// Issues that only matter with `--verbose` are dropped otherwise.
pub fn report(issues: &[Issue], verbose: bool) {
    report_to(issues, verbose, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
pub fn report_to<W: Write>(issues: &[Issue], verbose: bool, writer: &mut W) {
    let mut shown: Vec<&Issue> = issues
        .iter()
        .filter(|issue| verbose || !issue.is_verbose_only())
        .collect();
    if shown.is_empty() {
        return;
    }
    shown.sort();

    for issue in &shown {
        print_issue(issue, writer);
    }

    print_summary(&shown, writer);
}

/// Print the written catalog files and the update count.
pub fn print_updates(updates: &[FileUpdate]) {
    print_updates_to(updates, &mut io::stdout().lock());
}

/// Print updates to a custom writer.
pub fn print_updates_to<W: Write>(updates: &[FileUpdate], writer: &mut W) {
    let path_width = updates
        .iter()
        .map(|u| UnicodeWidthStr::width(u.path.as_str()))
        .max()
        .unwrap_or(0);

    for update in updates {
        let action = if update.created {
            "created".green().bold()
        } else {
            "updated".cyan().bold()
        };
        let padding = path_width - UnicodeWidthStr::width(update.path.as_str());
        let mut details = format!("+{}", plural(update.added, "entry", "entries"));
        if update.pending > 0 {
            details.push_str(&format!(", {} pending", update.pending));
        }
        let _ = writeln!(
            writer,
            "  {} {}{:padding$}  {}",
            action,
            update.path,
            "",
            details.dimmed(),
            padding = padding
        );
    }

    let pending: usize = updates.iter().map(|u| u.pending).sum();
    let summary = format!("{} file(s) updated", updates.len());
    if pending > 0 {
        let _ = writeln!(
            writer,
            "{} {} ({} left to translate)",
            SUCCESS_MARK.green(),
            summary.green(),
            plural(pending, "entry", "entries")
        );
    } else {
        let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), summary.green());
    }
}

pub fn print(outcome: &RunOutcome, verbose: bool) {
    report(&outcome.issues, verbose);
    if verbose {
        println!(
            "Scanned {}, found {}",
            plural(outcome.source_files, "source file", "source files"),
            plural(outcome.records, "string", "strings")
        );
    }
    print_updates(&outcome.updates);
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W) {
    let severity_str = match issue.report_severity() {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    // Clickable location: --> path:line:col
    match issue.location() {
        ReportLocation::Source(loc) => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), loc);
        }
        ReportLocation::File { path } => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
        }
        ReportLocation::None => {}
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(writer, "   {} {} {}", "=".blue(), "note:".bold(), details);
    }

    if let Some(hint) = issue.hint() {
        let _ = writeln!(writer, "   {} {} {}", "=".blue(), "hint:".bold().cyan(), hint);
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_summary<W: Write>(issues: &[&Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Warning)
        .count();
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "{} {} problems ({} {}, {} {})\n",
            FAILURE_MARK.red(),
            total_problems,
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow()
        );
    }
}

// ============================================================
// Tests
// ============================================================
