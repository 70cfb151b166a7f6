//! Run-scoped table of template records.
//!
//! Built once by the scanner and read-only afterwards. Records are keyed by
//! their catalog identity and kept in first-seen order so generated catalog
//! entries follow the order of the source files.

use std::collections::HashMap;

use crate::core::data::TemplateRecord;

#[derive(Debug, Default)]
pub struct StringTable {
    records: Vec<TemplateRecord>,
    index: HashMap<String, usize>,
}

/// Outcome of inserting a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new catalog identity.
    Added,
    /// An existing identity; notes were merged into the first record.
    Merged,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, merging notes into an existing record with the same identity.
    ///
    /// The first occurrence keeps its literal, parameters, and location; notes
    /// from later occurrences only fill slots that are still empty.
    pub fn insert(&mut self, record: TemplateRecord) -> InsertOutcome {
        let key = record.catalog_key().to_string();
        match self.index.get(&key) {
            Some(&idx) => {
                self.records[idx].notes.merge(&record.notes);
                InsertOutcome::Merged
            }
            None => {
                self.index.insert(key, self.records.len());
                self.records.push(record);
                InsertOutcome::Added
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &TemplateRecord> {
        self.records.iter()
    }
}

impl FromIterator<TemplateRecord> for StringTable {
    fn from_iter<I: IntoIterator<Item = TemplateRecord>>(iter: I) -> Self {
        let mut table = StringTable::new();
        for record in iter {
            table.insert(record);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::data::{Notes, SourceLocation};

    fn keys(table: &StringTable) -> Vec<&str> {
        table.iter().map(|r| r.catalog_key()).collect()
    }

    fn record(key: &str, note: Option<&str>, line: usize) -> TemplateRecord {
        let mut notes = Notes::new();
        if let Some(note) = note {
            notes.set_full_if_absent(note);
        }
        TemplateRecord {
            canonical_key: key.to_string(),
            literal: key.to_string(),
            params: Vec::new(),
            notes,
            explicit_key_override: None,
            location: SourceLocation::new("src/app.ts", line, 1),
        }
    }

    #[test]
    fn test_insert_deduplicates_and_merges_notes() {
        let mut table = StringTable::new();
        assert_eq!(table.insert(record("`Hello`", None, 1)), InsertOutcome::Added);
        assert_eq!(
            table.insert(record("`Hello`", Some("Greeting"), 5)),
            InsertOutcome::Merged
        );
        assert_eq!(
            table.insert(record("`Hello`", Some("Other greeting"), 9)),
            InsertOutcome::Merged
        );

        assert_eq!(table.len(), 1);
        let rec = table.iter().next().unwrap();
        assert_eq!(rec.location.line, 1);
        assert_eq!(rec.notes.full(), Some("Greeting"));
    }

    #[test]
    fn test_trailing_whitespace_variants_are_distinct() {
        let table: StringTable = [record("`Hello`", None, 1), record("`Hello `", None, 2)]
            .into_iter()
            .collect();

        assert_eq!(keys(&table), vec!["`Hello`", "`Hello `"]);
    }

    #[test]
    fn test_override_is_identity() {
        let mut rec = record("`Hello`", None, 1);
        rec.explicit_key_override = Some("greeting".to_string());

        let mut table = StringTable::new();
        table.insert(rec);
        table.insert(record("`Hello`", None, 2));

        assert_eq!(keys(&table), vec!["greeting", "`Hello`"]);
    }

    #[test]
    fn test_iteration_order_is_first_seen() {
        let table: StringTable = [
            record("`b`", None, 1),
            record("`a`", None, 2),
            record("`b`", None, 3),
        ]
        .into_iter()
        .collect();

        assert_eq!(keys(&table), vec!["`b`", "`a`"]);
    }
}
