use std::collections::HashMap;

use pulse_core::Record;

use crate::hashtags::hashtag_keys;
use crate::tokenize::tokenize;

/// Occurrence counts keyed by string, remembering first-seen order.
///
/// Iteration yields keys in the order they were first added, which the
/// top-K ranking relies on to break ties deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl FrequencyTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every key of a (possibly empty) key sequence.
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        keys.into_iter().collect()
    }

    pub fn add(&mut self, key: &str) {
        if let Some(&slot) = self.index.get(key) {
            self.entries[slot].1 += 1;
        } else {
            self.index.insert(key.to_string(), self.entries.len());
            self.entries.push((key.to_string(), 1));
        }
    }

    #[must_use]
    pub fn count(&self, key: &str) -> u64 {
        self.index.get(key).map_or(0, |&slot| self.entries[slot].1)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts; equals the length of the counted sequence.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// `(key, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.iter().map(|(key, count)| (key.as_str(), *count))
    }
}

impl<K: AsRef<str>> Extend<K> for FrequencyTable {
    fn extend<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        for key in keys {
            self.add(key.as_ref());
        }
    }
}

impl<K: AsRef<str>> FromIterator<K> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = K>>(keys: I) -> Self {
        let mut table = Self::new();
        table.extend(keys);
        table
    }
}

/// Word counts pooled over every record's text, records in batch order.
#[must_use]
pub fn word_frequencies(records: &[Record]) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for record in records {
        table.extend(&tokenize(&record.text));
    }
    table
}

/// Hashtag counts pooled over every record's text, keyed case-insensitively.
#[must_use]
pub fn hashtag_frequencies(records: &[Record]) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for record in records {
        table.extend(hashtag_keys(&record.text));
    }
    table
}
