//! # Extracted Records
//!
//! A [`Record`] is one extracted row (or one vertical table), keyed by the
//! caller's column keys. A [`HeaderMap`] ties those keys to column positions.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub use serde_json::Value;

/// Key/value output of a single extraction, in insertion order.
///
/// Equality ignores insertion order.
pub type Record = serde_json::Map<String, Value>;

/// Column key to zero-based child index, built from a header row.
///
/// Keys keep the position of their first insertion; assigning an existing key
/// again replaces its index.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    columns: Vec<(String, usize)>,
}

impl HeaderMap {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Assign `index` to `key`, returning the index it replaced
    pub fn insert(&mut self, key: impl Into<String>, index: usize) -> Option<usize> {
        let key = key.into();
        if let Some(slot) = self.columns.iter_mut().find(|(existing, _)| *existing == key) {
            return Some(std::mem::replace(&mut slot.1, index));
        }
        self.columns.push((key, index));
        None
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, index)| *index)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate `(key, index)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.columns
            .iter()
            .map(|(key, index)| (key.as_str(), *index))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(key, _)| key.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl PartialEq for HeaderMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(key, index)| other.get(key) == Some(index))
    }
}

impl Eq for HeaderMap {}

impl<K: Into<String>> FromIterator<(K, usize)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, usize)>>(iter: I) -> Self {
        let mut header_map = Self::new();
        for (key, index) in iter {
            header_map.insert(key, index);
        }
        header_map
    }
}

impl Serialize for HeaderMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (key, index) in &self.columns {
            map.serialize_entry(key, index)?;
        }
        map.end()
    }
}

/// Result of a horizontal table extraction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableData {
    /// Header map the rows were extracted with
    pub header_map: HeaderMap,
    /// One record per accepted content row, in document order
    pub data: Vec<Record>,
}

impl TableData {
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
