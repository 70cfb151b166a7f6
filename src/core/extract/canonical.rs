//! Canonical key derivation.
//!
//! A template's canonical key is built from its literal skeleton only: the
//! head chunk, then for each slot its ordinal followed by the chunk after it.
//!
//! ```text
//! `Total: ${count} of ${max}`
//!  head   = "`Total: ${"
//!  tails  = ["} of ${", "}`"]
//!  key    = "`Total: ${0} of ${1}`"
//! ```
//!
//! Renaming `count` leaves the key unchanged; touching any literal character
//! or adding/removing a slot changes it.

use swc_ecma_ast::Tpl;

/// Build the canonical key from a head chunk and the ordered chunks following each slot.
pub fn canonical_key<S: AsRef<str>>(head: &str, tails: &[S]) -> String {
    let mut key = String::from(head);
    for (ordinal, tail) in tails.iter().enumerate() {
        key.push_str(&ordinal.to_string());
        key.push_str(tail.as_ref());
    }
    key
}

/// Literal skeleton of a template: delimiters included, raw (uncooked) text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skeleton {
    pub head: String,
    pub tails: Vec<String>,
}

impl Skeleton {
    /// Build the skeleton of a template literal from its quasis.
    ///
    /// Returns `None` when the quasi/expression pairing is malformed.
    pub fn of(tpl: &Tpl) -> Option<Self> {
        if tpl.quasis.len() != tpl.exprs.len() + 1 {
            return None;
        }
        let chunks: Vec<&str> = tpl.quasis.iter().map(|q| &*q.raw).collect();
        Some(Self::from_chunks(&chunks))
    }

    /// Build a skeleton from the raw text chunks between slots.
    pub fn from_chunks(chunks: &[&str]) -> Self {
        let last = chunks.len().saturating_sub(1);
        let close = |idx: usize| if idx == last { "`" } else { "${" };

        let head = match chunks.first() {
            Some(first) => format!("`{}{}", first, close(0)),
            None => "``".to_string(),
        };
        let tails = chunks
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, chunk)| format!("}}{}{}", chunk, close(idx)))
            .collect();

        Self { head, tails }
    }

    pub fn slot_count(&self) -> usize {
        self.tails.len()
    }

    pub fn canonical_key(&self) -> String {
        canonical_key(&self.head, &self.tails)
    }

    /// Inline the given names into the slots: `` `Total: ${count}` ``.
    pub fn inline<S: AsRef<str>>(&self, names: &[S]) -> String {
        let mut text = self.head.clone();
        for (name, tail) in names.iter().zip(&self.tails) {
            text.push_str(name.as_ref());
            text.push_str(tail);
        }
        text
    }
}

/// Strip a template's backtick delimiters.
///
/// Text without delimiters is returned unchanged.
pub fn strip_template_quotes(text: &str) -> &str {
    text.strip_prefix('`')
        .and_then(|inner| inner.strip_suffix('`'))
        .unwrap_or(text)
}
