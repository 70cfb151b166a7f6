use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::core::parsers::json::{LoadedDocument, load_document};

/// Flat key/value document that is only written back when it changed.
pub struct JsonWriter {
    file_path: PathBuf,
    data: Map<String, Value>,
    original: Option<String>,
    added: usize,
}

impl JsonWriter {
    /// Open an existing document or start an empty one.
    pub fn open_or_create(path: &Path) -> Result<Self> {
        let LoadedDocument { entries, original } = load_document(path)?;
        Ok(Self {
            file_path: path.to_path_buf(),
            data: entries,
            original,
            added: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn exists(&self) -> bool {
        self.original.is_some()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    /// Insert a string entry unless the key is already present.
    ///
    /// Returns `true` if the entry was added. Existing values are never touched.
    pub fn add_if_absent(&mut self, key: &str, value: impl Into<String>) -> bool {
        if self.data.contains_key(key) {
            return false;
        }
        self.data.insert(key.to_string(), Value::String(value.into()));
        self.added += 1;
        true
    }

    pub fn added(&self) -> usize {
        self.added
    }

    fn render(&self) -> Result<String> {
        let content = serde_json::to_string_pretty(&Value::Object(self.data.clone()))
            .context("Failed to serialize JSON")?;
        Ok(format!("{}\n", content))
    }

    /// Write the document if it did not exist, or if entries were added and
    /// the serialized content differs from the file.
    ///
    /// Uses 2-space indentation and adds a trailing newline. Returns `true`
    /// when the file was written.
    pub fn save_if_changed(&self) -> Result<bool> {
        let content = self.render()?;
        let changed = match &self.original {
            None => true,
            Some(original) => self.added > 0 && *original != content,
        };
        if !changed {
            return Ok(false);
        }

        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&self.file_path, content)
            .with_context(|| format!("Failed to write file: {}", self.file_path.display()))?;

        Ok(true)
    }
}
