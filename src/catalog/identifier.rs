use crate::core::TemplateRecord;
use crate::utils::has_alphabetic_run;

/// Document identifier of a record, or `None` when the record carries no
/// translatable text.
///
/// An explicit key override is used verbatim. Otherwise the stripped literal
/// is split into alphanumeric words which are capitalized and joined:
/// `Total: ${count}` becomes `TotalCount`.
pub fn document_identifier(record: &TemplateRecord) -> Option<String> {
    if !has_alphabetic_run(record.stripped_key()) {
        return None;
    }
    if let Some(key) = &record.explicit_key_override {
        return Some(key.clone());
    }
    let identifier = pascal_case(record.stripped_literal());
    (!identifier.is_empty()).then_some(identifier)
}

fn pascal_case(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::{Notes, SourceLocation};

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
    fn test_identifier_from_literal() {
        assert_eq!(
            document_identifier(&record("`Total: ${0}`", "`Total: ${count}`")).as_deref(),
            Some("TotalCount")
        );
        assert_eq!(
            document_identifier(&record("`sign in now`", "`sign in now`")).as_deref(),
            Some("SignInNow")
        );
    }

    #[test]
    fn test_identifier_keeps_inner_case() {
        assert_eq!(
            document_identifier(&record("`Open ${0} in iOS`", "`Open ${fileName} in iOS`"))
                .as_deref(),
            Some("OpenFileNameInIOS")
        );
    }

    #[test]
    fn test_identifier_uses_override() {
        let mut rec = record("`Hello`", "`Hello`");
        rec.explicit_key_override = Some("greeting".to_string());
        assert_eq!(document_identifier(&rec).as_deref(), Some("greeting"));
    }

    #[test]
    fn test_identifier_skips_non_text() {
        assert_eq!(document_identifier(&record("`${0}`", "`${count}`")), None);
        assert_eq!(document_identifier(&record("`${0} - ${1}`", "`${a} - ${b}`")), None);
    }

    #[test]
    fn test_trailing_whitespace_shares_identifier() {
        let a = document_identifier(&record("`Hello`", "`Hello`"));
        let b = document_identifier(&record("`Hello `", "`Hello `"));
        assert_eq!(a, b);
    }
}
