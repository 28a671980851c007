//! Core types shared by the parsers, the validator, and the pipeline.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// The ordered key/value mapping extracted from one uploaded resource file.
///
/// Keys are unique. Inserting a key that is already present overwrites its
/// value while keeping the key's original position, so iteration order stays
/// stable across duplicate occurrences and error reporting is deterministic.
///
/// A mapping is created fresh per upload, consumed by the validator, and
/// handed to the submission side by value; it never outlives one upload.
#[derive(Debug, Clone, Default)]
pub struct ResourceMapping {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl ResourceMapping {
    /// Creates a new, empty mapping.
    pub fn new() -> Self {
        ResourceMapping::default()
    }

    /// Inserts a key/value pair. Last write wins on duplicate keys.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Looks up the value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1.as_str())
    }

    /// Number of entries in the mapping.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl PartialEq for ResourceMapping {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for ResourceMapping {}

impl FromIterator<(String, String)> for ResourceMapping {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut mapping = ResourceMapping::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

/// Serializes as a JSON object in insertion order, which is the shape the
/// submission envelope's `data` member expects.
impl Serialize for ResourceMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
