//! Insertion-ordered frequency counter

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Counts occurrences of string keys, remembering first-seen order
///
/// `most_common` breaks ties by first-seen order, so results are stable for a
/// given input sequence.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    pub fn extend<'a, I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for key in keys {
            self.add(key);
        }
    }

    pub fn count(&self, key: &str) -> u64 {
        self.index.get(key).map(|&i| self.entries[i].1).unwrap_or(0)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `n` keys by descending count
    pub fn most_common(&self, n: usize) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .entries
            .iter()
            .map(|(k, c)| (k.as_str(), *c))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}
