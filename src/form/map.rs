//! Decoded key/value map.

use std::collections::hash_map;
use std::collections::HashMap;

use serde::{Serialize, Serializer};

/// Result of a form parse: decoded keys to decoded values.
///
/// Keys are unique and inserting an existing key replaces its value. By
/// default keys compare ordinally (exact characters). A map built with
/// [`FormMap::case_insensitive`] compares keys after Unicode lowercasing,
/// keeps the spelling of the first key inserted and looks up in any case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormMap {
    entries: HashMap<String, String>,
    /// Lowercased key -> stored spelling; present only when case-insensitive.
    folded: Option<HashMap<String, String>>,
}

impl FormMap {
    /// Empty case-sensitive map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty map comparing keys case-insensitively.
    pub fn case_insensitive() -> Self {
        Self {
            entries: HashMap::new(),
            folded: Some(HashMap::new()),
        }
    }

    /// Empty map with the given key comparison.
    pub fn with_case_sensitivity(case_sensitive: bool) -> Self {
        if case_sensitive {
            Self::new()
        } else {
            Self::case_insensitive()
        }
    }

    /// Whether keys compare ordinally.
    pub fn is_case_sensitive(&self) -> bool {
        self.folded.is_none()
    }

    /// Insert a pair, replacing the value of an existing key.
    /// Returns the previous value, if any.
    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        let Some(folded) = self.folded.as_mut() else {
            return self.entries.insert(key, value);
        };

        match folded.entry(key.to_lowercase()) {
            hash_map::Entry::Occupied(existing) => {
                self.entries.insert(existing.get().clone(), value)
            }
            hash_map::Entry::Vacant(slot) => {
                slot.insert(key.clone());
                self.entries.insert(key, value)
            }
        }
    }

    /// Value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match &self.folded {
            None => self.entries.get(key),
            Some(folded) => folded
                .get(&key.to_lowercase())
                .and_then(|stored| self.entries.get(stored)),
        };
        value.map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Underlying map, keyed by stored spelling.
    pub fn into_inner(self) -> HashMap<String, String> {
        self.entries
    }
}

impl From<FormMap> for HashMap<String, String> {
    fn from(map: FormMap) -> Self {
        map.into_inner()
    }
}

impl IntoIterator for FormMap {
    type Item = (String, String);
    type IntoIter = hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for FormMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(&self.entries)
    }
}
