//! Reference model for tracking expected store state
//!
//! The reference model keeps a plain ordered list of the ids that should be
//! live after a sequence of operations, so a [`ClassStore`](crate::ClassStore)
//! can be checked against it.
//!
//! # Example
//!
//! ```ignore
//! use mockrecord_storage::testing::{Operation, ReferenceModel};
//!
//! let mut model = ReferenceModel::new();
//! model.apply(&Operation::Insert(1));
//! model.apply(&Operation::Delete(1));
//! assert!(model.live_ids().is_empty());
//! ```

/// Operation recorded in the reference model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Insert a fresh record with this id
    Insert(i64),
    /// Delete the record with this id (no-op when absent)
    Delete(i64),
    /// Remove every record
    Clear,
}

/// Expected live ids in insertion order
#[derive(Debug, Default)]
pub struct ReferenceModel {
    live: Vec<i64>,
    applied: usize,
}

impl ReferenceModel {
    /// Create a new reference model
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an operation
    ///
    /// Inserting an id that is already live is skipped, matching a store
    /// configured to reject duplicate ids.
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::Insert(id) => {
                if !self.live.contains(id) {
                    self.live.push(*id);
                }
            }
            Operation::Delete(id) => self.live.retain(|live| live != id),
            Operation::Clear => self.live.clear(),
        }
        self.applied += 1;
    }

    /// Ids expected to be live, in insertion order
    pub fn live_ids(&self) -> &[i64] {
        &self.live
    }

    /// Number of operations applied so far
    pub fn applied(&self) -> usize {
        self.applied
    }
}
