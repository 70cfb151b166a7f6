//! Template records produced by the scanner.
//!
//! A `TemplateRecord` describes one distinct translatable template: its
//! canonical key, the literal payload with parameter names inlined, the
//! parameters in slot order, and any author notes.
//!
//! Records live only for the duration of a run. They are never persisted
//! directly, only projected into catalog entries.

use std::{collections::BTreeMap, fmt};

use crate::core::data::SourceLocation;
use crate::core::extract::canonical::strip_template_quotes;

/// Static type descriptor of a substituted expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// A type that could be determined from an annotation or inferred from the expression.
    Known(String),
    /// The type could not be resolved.
    Unknown,
}

impl ParamType {
    pub fn known(ty: impl Into<String>) -> Self {
        ParamType::Known(ty.into())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ParamType::Unknown)
    }

    /// Render as a TypeScript type annotation.
    ///
    /// `Unknown` is rendered as `any` so generated functions accept whatever the call site passes.
    pub fn to_typescript(&self) -> &str {
        match self {
            ParamType::Known(ty) => ty,
            ParamType::Unknown => "any",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Known(ty) => write!(f, "{}", ty),
            ParamType::Unknown => write!(f, "unknown"),
        }
    }
}

/// One substitution slot of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    /// Identifier name for bare identifiers, `p<ordinal>` otherwise.
    pub name: String,
    /// Annotated or inferred type of the substituted expression.
    pub ty: ParamType,
    /// Exact expression text at the call site. Used for notes only, never for identity.
    pub original_source_text: String,
}

impl ParameterDescriptor {
    pub fn new(
        name: impl Into<String>,
        ty: ParamType,
        original_source_text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ty,
            original_source_text: original_source_text.into(),
        }
    }
}

/// Author notes of a template.
///
/// The call-level description (the `full` note) is kept apart from the
/// per-parameter descriptions, so a parameter may be named `full`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notes {
    full: Option<String>,
    params: BTreeMap<String, String>,
}

impl Notes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the call-level note unless one already exists.
    pub fn set_full_if_absent(&mut self, text: impl Into<String>) {
        self.full.get_or_insert_with(|| text.into());
    }

    /// Set a parameter note unless one already exists for the parameter.
    pub fn insert_param_if_absent(&mut self, param: impl Into<String>, text: impl Into<String>) {
        self.params.entry(param.into()).or_insert_with(|| text.into());
    }

    pub fn full(&self) -> Option<&str> {
        self.full.as_deref()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Union with another note set. Existing notes are kept for slots present in both.
    pub fn merge(&mut self, other: &Notes) {
        if let Some(full) = &other.full {
            self.set_full_if_absent(full.clone());
        }
        for (param, text) in &other.params {
            self.insert_param_if_absent(param.clone(), text.clone());
        }
    }
}

/// A translatable template discovered in source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRecord {
    /// Parameter-agnostic identity, including the template delimiters: `` `Total: ${0}` ``.
    pub canonical_key: String,
    /// Template text with parameter names inlined: `` `Total: ${count}` ``.
    pub literal: String,
    /// Parameters in order of appearance.
    pub params: Vec<ParameterDescriptor>,
    pub notes: Notes,
    /// Key pinned by an `@word` annotation at the call site.
    pub explicit_key_override: Option<String>,
    /// First occurrence of the template.
    pub location: SourceLocation,
}

impl TemplateRecord {
    /// Identity of the record in catalogs: the explicit override when present,
    /// the canonical key otherwise.
    pub fn catalog_key(&self) -> &str {
        self.explicit_key_override
            .as_deref()
            .unwrap_or(&self.canonical_key)
    }

    /// Canonical key without its template delimiters: `Total: ${0}`.
    pub fn stripped_key(&self) -> &str {
        strip_template_quotes(&self.canonical_key)
    }

    /// Literal without its template delimiters: `Total: ${count}`.
    pub fn stripped_literal(&self) -> &str {
        strip_template_quotes(&self.literal)
    }

    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    pub fn param_note(&self, param: &ParameterDescriptor) -> Option<&str> {
        self.notes.param(&param.name)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(canonical_key: &str, literal: &str) -> TemplateRecord {
        TemplateRecord {
            canonical_key: canonical_key.to_string(),
            literal: literal.to_string(),
            params: Vec::new(),
            notes: Notes::new(),
            explicit_key_override: None,
            location: SourceLocation::new("src/app.ts", 1, 1),
        }
    }

    #[test]
    fn test_catalog_key_prefers_override() {
        let mut rec = record("`Hello`", "`Hello`");
        assert_eq!(rec.catalog_key(), "`Hello`");

        rec.explicit_key_override = Some("greeting".to_string());
        assert_eq!(rec.catalog_key(), "greeting");
    }

    #[test]
    fn test_stripped_texts() {
        let rec = record("`Total: ${0}`", "`Total: ${count}`");
        assert_eq!(rec.stripped_key(), "Total: ${0}");
        assert_eq!(rec.stripped_literal(), "Total: ${count}");
    }

    #[test]
    fn test_notes_merge_keeps_earlier() {
        let mut first = Notes::new();
        first.set_full_if_absent("Shown in the header");

        let mut second = Notes::new();
        second.set_full_if_absent("Shown in the footer");
        second.insert_param_if_absent("count", "Number of items");

        first.merge(&second);

        assert_eq!(first.full(), Some("Shown in the header"));
        assert_eq!(first.param("count"), Some("Number of items"));
    }

    #[test]
    fn test_param_named_full_keeps_its_own_note() {
        let mut rec = record("`${0} items`", "`${full} items`");
        rec.params.push(ParameterDescriptor::new("full", ParamType::known("number"), "full"));
        rec.notes.set_full_if_absent("Shown in cart");
        rec.notes.insert_param_if_absent("full", "count of items");

        assert_eq!(rec.notes.full(), Some("Shown in cart"));
        assert_eq!(rec.param_note(&rec.params[0]), Some("count of items"));
    }

    #[test]
    fn test_param_type_rendering() {
        assert_eq!(ParamType::known("number").to_typescript(), "number");
        assert_eq!(ParamType::Unknown.to_typescript(), "any");
        assert_eq!(ParamType::Unknown.to_string(), "unknown");
    }
}
