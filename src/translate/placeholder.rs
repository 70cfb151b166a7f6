//! Shields `${...}` spans from the translation provider.
//!
//! Each span is swapped for an opaque sentinel before the text is sent and put
//! back afterwards, so the provider never rewrites parameter expressions.

use std::sync::LazyLock;

use regex::Regex;

use super::provider::ProviderError;

// Providers occasionally insert spaces inside tokens they do not understand.
static SENTINEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__\s*TSP\s*(\d+)\s*__").unwrap());

/// Text with every `${...}` span replaced by a sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protected {
    pub text: String,
    /// Original spans, indexed by sentinel ordinal.
    pub spans: Vec<String>,
}

fn sentinel(ordinal: usize) -> String {
    format!("__TSP{ordinal}__")
}

/// Replace each `${...}` span (nested braces included) with `__TSP<i>__`.
///
/// An unterminated `${` is left as plain text.
pub fn protect(text: &str) -> Protected {
    let mut out = String::with_capacity(text.len());
    let mut spans = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        let Some(len) = span_len(&rest[start..]) else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(&sentinel(spans.len()));
        spans.push(rest[start..start + len].to_string());
        rest = &rest[start + len..];
    }
    out.push_str(rest);

    Protected { text: out, spans }
}

/// Byte length of the `${...}` span at the start of `text`.
fn span_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices().skip(1) {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Put the protected spans back into `text`.
///
/// Every ordinal must appear exactly once; anything else means the provider
/// mangled a placeholder and the translation cannot be trusted.
pub fn restore(text: &str, spans: &[String]) -> Result<String, ProviderError> {
    let mut seen = vec![false; spans.len()];
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in SENTINEL_REGEX.captures_iter(text) {
        let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let ordinal: usize = digits.as_str().parse().map_err(|_| {
            ProviderError::PlaceholderMismatch(format!("invalid ordinal `{}`", digits.as_str()))
        })?;
        let Some(span) = spans.get(ordinal) else {
            return Err(ProviderError::PlaceholderMismatch(format!(
                "placeholder {ordinal} out of range"
            )));
        };
        if seen[ordinal] {
            return Err(ProviderError::PlaceholderMismatch(format!(
                "placeholder {ordinal} duplicated"
            )));
        }
        seen[ordinal] = true;
        out.push_str(&text[last..whole.start()]);
        out.push_str(span);
        last = whole.end();
    }
    out.push_str(&text[last..]);

    if let Some(missing) = seen.iter().position(|s| !s) {
        return Err(ProviderError::PlaceholderMismatch(format!(
            "placeholder {missing} missing"
        )));
    }
    Ok(out)
}

/// Escape bare backticks so translated text can live inside a template literal.
pub fn escape_backticks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut escaped = false;
    for c in text.chars() {
        if c == '`' && !escaped {
            out.push('\\');
        }
        escaped = c == '\\' && !escaped;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_protect_replaces_spans_in_order() {
        let protected = protect("Hi ${name}, you have ${count} items");
        assert_eq!(protected.text, "Hi __TSP0__, you have __TSP1__ items");
        assert_eq!(protected.spans, vec!["${name}", "${count}"]);
    }

    #[test]
    fn test_protect_handles_nested_braces() {
        let protected = protect("Value: ${fmt({ a: 1 })}!");
        assert_eq!(protected.text, "Value: __TSP0__!");
        assert_eq!(protected.spans, vec!["${fmt({ a: 1 })}"]);
    }

    #[test]
    fn test_protect_leaves_unterminated_span() {
        let protected = protect("broken ${oops");
        assert_eq!(protected.text, "broken ${oops");
        assert!(protected.spans.is_empty());
    }

    #[test]
    fn test_round_trip_is_identity() {
        for text in [
            "",
            "plain",
            "Total: ${count}",
            "${a}${b}",
            "${user.name} has ${items.filter(i => { return i.ok; }).length}",
            "tail only ${x}",
        ] {
            let protected = protect(text);
            assert_eq!(restore(&protected.text, &protected.spans).unwrap(), text);
        }
    }

    #[test]
    fn test_restore_tolerates_inserted_whitespace() {
        let spans = vec!["${count}".to_string()];
        assert_eq!(
            restore("Gesamt: __ TSP 0 __", &spans).unwrap(),
            "Gesamt: ${count}"
        );
    }

    #[test]
    fn test_restore_allows_reordering() {
        let spans = vec!["${a}".to_string(), "${b}".to_string()];
        assert_eq!(restore("__TSP1__ then __TSP0__", &spans).unwrap(), "${b} then ${a}");
    }

    #[test]
    fn test_restore_rejects_missing_placeholder() {
        let spans = vec!["${a}".to_string(), "${b}".to_string()];
        let err = restore("only __TSP0__", &spans).unwrap_err();
        assert!(matches!(err, ProviderError::PlaceholderMismatch(_)));
    }

    #[test]
    fn test_restore_rejects_duplicate_placeholder() {
        let spans = vec!["${a}".to_string()];
        assert!(restore("__TSP0__ __TSP0__", &spans).is_err());
    }

    #[test]
    fn test_restore_rejects_out_of_range_placeholder() {
        let spans = vec!["${a}".to_string()];
        assert!(restore("__TSP0__ __TSP3__", &spans).is_err());
    }

    #[test]
    fn test_escape_backticks() {
        assert_eq!(escape_backticks("say `hi`"), "say \\`hi\\`");
        assert_eq!(escape_backticks("already \\` fine"), "already \\` fine");
        assert_eq!(escape_backticks("none"), "none");
    }
}
