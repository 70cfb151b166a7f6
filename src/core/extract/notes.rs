//! Author annotations attached to translatable templates.
//!
//! A call-level annotation is the comment trailing the tagged template on the
//! same line:
//!
//! ```ts
//! t`Total: ${count}`; // @cartTotal Shown under the cart
//! ```
//!
//! A per-parameter annotation sits inside the slot:
//!
//! ```ts
//! t`Total: ${count /* number of items */}`
//! ```
//!
//! The annotation body is trimmed of comment delimiters. A leading `@word`
//! token pins an explicit catalog key; the rest is free text.

use swc_common::{BytePos, comments::Comment};

use crate::core::parsers::source::ParsedSource;

/// A parsed annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    /// `word` from a leading `@word` token.
    pub key_override: Option<String>,
    /// Remaining free text, `None` when empty.
    pub text: Option<String>,
}

/// Strip comment delimiters and JSDoc line prefixes, then collapse the
/// remaining lines into a single space-separated string.
pub fn clean_comment_text(raw: &str) -> String {
    let mut body = raw.trim();
    if let Some(rest) = body.strip_prefix("//") {
        body = rest;
    }
    if let Some(rest) = body.strip_prefix("/*") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("*/") {
        body = rest;
    }

    body.lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '.' | '-')
}

/// Split an `@word` prefix from the rest of the text.
///
/// Returns `None` when the text does not start with an `@word` token.
fn split_key_token(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix('@')?;
    let end = rest.find(|c: char| !is_key_char(c)).unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let (word, remainder) = rest.split_at(end);
    // `@word:` or `@word(` is not a key token.
    if remainder.chars().next().is_some_and(|c| !c.is_whitespace()) {
        return None;
    }
    Some((word, remainder.trim()))
}

impl Annotation {
    /// Parse a call-level annotation body.
    pub fn parse(raw: &str) -> Self {
        let cleaned = clean_comment_text(raw);
        match split_key_token(&cleaned) {
            Some((word, rest)) => Self {
                key_override: Some(word.to_string()),
                text: (!rest.is_empty()).then(|| rest.to_string()),
            },
            None => Self {
                key_override: None,
                text: (!cleaned.is_empty()).then_some(cleaned),
            },
        }
    }
}

/// Characters allowed between the end of a tagged template and its trailing comment.
fn is_trailing_trivia(c: char) -> bool {
    matches!(c, ' ' | '\t' | ';' | ',' | ')')
}

/// Find the comment trailing a node that ends at `node_hi`, on the same line.
pub fn trailing_comment(source: &ParsedSource, node_hi: BytePos) -> Option<&Comment> {
    let comment = source.comments.first_from(node_hi)?;
    let between = source.text_between(node_hi, comment.span.lo)?;
    between
        .chars()
        .all(is_trailing_trivia)
        .then_some(comment)
}

/// Call-level annotation for a node ending at `node_hi`.
pub fn call_annotation(source: &ParsedSource, node_hi: BytePos) -> Annotation {
    trailing_comment(source, node_hi)
        .map(|cmt| Annotation::parse(&cmt.text))
        .unwrap_or_default()
}

/// Per-parameter note: text of all comments inside a slot region.
pub fn slot_note(source: &ParsedSource, lo: BytePos, hi: BytePos) -> Option<String> {
    let text = source
        .comments
        .within(lo, hi)
        .map(|cmt| clean_comment_text(&cmt.text))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}
