//! Flat key-value store produced by the parser
//!
//! Keys are composite `section.field` strings; unsectioned entries use the
//! empty section and look like `.field`. A `Store` has no public mutation
//! API: it is filled by a single parse pass and only read afterwards.

use indexmap::IndexMap;
use serde::Serialize;

/// Immutable mapping of composite keys to raw (unresolved) values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Store {
    entries: IndexMap<String, String>,
}

/// Build the composite key for a section and field
pub fn composite_key(section: &str, field: &str) -> String {
    format!("{}.{}", section, field)
}

impl Store {
    /// Get the raw value stored under a composite key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    /// Check whether a composite key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over keys in first-assignment order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    /// Iterate over `(key, raw value)` pairs in first-assignment order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Assign a value, overwriting any earlier one (last write wins)
    pub(crate) fn assign(&mut self, key: String, value: String) {
        self.entries.insert(key, value);
    }

    /// Append a continuation line to an existing value
    ///
    /// Returns false if the key was never assigned.
    pub(crate) fn append(&mut self, key: &str, separator: &str, line: &str) -> bool {
        match self.entries.get_mut(key) {
            Some(value) => {
                value.push_str(separator);
                value.push_str(line);
                true
            }
            None => false,
        }
    }

    /// Overlay another store on top of this one
    pub(crate) fn overlay(&mut self, other: Store) {
        for (key, value) in other.entries {
            self.entries.insert(key, value);
        }
    }
}
