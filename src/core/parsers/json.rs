use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

/// A flat key/value document as found on disk.
#[derive(Debug, Default)]
pub struct LoadedDocument {
    /// Entries in file order.
    pub entries: Map<String, Value>,
    /// Raw file content, `None` when the file does not exist yet.
    pub original: Option<String>,
}

impl LoadedDocument {
    pub fn exists(&self) -> bool {
        self.original.is_some()
    }
}

/// Load a flat document. A missing or blank file yields an empty document.
///
/// Nested objects are kept as-is (they are never translation entries but
/// must survive a rewrite).
pub fn load_document(path: &Path) -> Result<LoadedDocument> {
    if !path.exists() {
        return Ok(LoadedDocument::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(LoadedDocument {
            entries: Map::new(),
            original: Some(content),
        });
    }

    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file: {}", path.display()))?;

    match value {
        Value::Object(entries) => Ok(LoadedDocument {
            entries,
            original: Some(content),
        }),
        _ => bail!("Root of JSON file must be an object: {}", path.display()),
    }
}
