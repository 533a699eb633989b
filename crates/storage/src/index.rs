//! Record index: identity key → record
//!
//! O(1) identity lookup for one class. The index never mutates on its own;
//! [`ClassStore`](crate::store::ClassStore) pairs every index mutation with
//! the matching collection mutation.

use mockrecord_core::{IdKey, Identified};
use std::collections::HashMap;

/// Secondary index: IdKey → Record
///
/// Maps the stringified (optionally typed) id of each live record to the
/// record handle.
#[derive(Debug)]
pub struct RecordIndex<R> {
    entries: HashMap<IdKey, R>,
}

impl<R: Identified> RecordIndex<R> {
    /// Create a new empty RecordIndex
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Store a record under `key`
    ///
    /// Returns the record previously held under the same key, if any.
    pub fn put(&mut self, key: IdKey, record: R) -> Option<R> {
        self.entries.insert(key, record)
    }

    /// Look up a record by key
    pub fn get(&self, key: &IdKey) -> Option<&R> {
        self.entries.get(key)
    }

    /// Remove the entry for `key`
    pub fn delete(&mut self, key: &IdKey) -> Option<R> {
        self.entries.remove(key)
    }

    /// Remove the entry for `key` only if it refers to `record`
    ///
    /// After a collision overwrite the key belongs to a different record;
    /// removing the loser must not evict the winner.
    pub fn delete_record(&mut self, key: &IdKey, record: &R) -> bool {
        match self.entries.get(key) {
            Some(held) if held.same_record(record) => {
                self.entries.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Check whether `record` is the entry for `key`
    pub fn holds(&self, key: &IdKey, record: &R) -> bool {
        self.entries
            .get(key)
            .map_or(false, |held| held.same_record(record))
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the number of keys in the index
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over all entries (arbitrary order)
    pub fn iter(&self) -> impl Iterator<Item = (&IdKey, &R)> {
        self.entries.iter()
    }
}

impl<R: Identified> Default for RecordIndex<R> {
    fn default() -> Self {
        Self::new()
    }
}
