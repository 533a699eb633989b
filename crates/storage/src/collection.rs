//! Collection: the ordered sequence of live records for one class
//!
//! Insertion order is the canonical enumeration order. The collection owns
//! record lifetime: removal drops the collection's handle outright.

use mockrecord_core::Identified;

/// Ordered sequence of records
#[derive(Debug)]
pub struct Collection<R> {
    records: Vec<R>,
}

impl<R: Identified> Collection<R> {
    /// Create a new empty collection
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record
    pub fn push(&mut self, record: R) {
        self.records.push(record);
    }

    /// Position of `record` (by identity)
    pub fn position(&self, record: &R) -> Option<usize> {
        self.records.iter().position(|r| r.same_record(record))
    }

    /// Check whether `record` (by identity) is a member
    pub fn contains(&self, record: &R) -> bool {
        self.position(record).is_some()
    }

    /// Remove `record` (by identity)
    ///
    /// Returns `false` when the record is not a member.
    pub fn remove(&mut self, record: &R) -> bool {
        match self.position(record) {
            Some(pos) => {
                self.records.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Remove every record, returning how many were removed
    pub fn clear(&mut self) -> usize {
        let count = self.records.len();
        self.records.clear();
        count
    }

    /// Borrow the records in insertion order
    pub fn as_slice(&self) -> &[R] {
        &self.records
    }

    /// Clone the record handles in insertion order
    pub fn snapshot(&self) -> Vec<R> {
        self.records.clone()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: Identified> Default for Collection<R> {
    fn default() -> Self {
        Self::new()
    }
}
