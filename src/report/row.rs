// src/report/row.rs

use std::path::Path;

/// Field holding the pattern's base file name.
pub const ID_FIELD: &str = "id";

/// One pattern's extracted measurement.
///
/// Field order is insertion order. Inserting an existing key replaces the
/// value but keeps the original position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    fields: Vec<(String, String)>,
}

impl ResultRow {
    /// A row holding only the `id` field.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            fields: vec![(ID_FIELD.to_string(), id.into())],
        }
    }

    /// Row for a pattern file, keyed by its base name without extension.
    pub fn for_pattern(pattern: &Path) -> Self {
        Self::new(pattern_id(pattern))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn id(&self) -> &str {
        self.get(ID_FIELD).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Base file name of a pattern with its extension stripped.
pub fn pattern_id(pattern: &Path) -> String {
    pattern
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
