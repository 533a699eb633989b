//! ClassStore: per-class collection + record index kept in lock-step
//!
//! ## Invariant
//!
//! A record is in the index if and only if it is in the collection, keyed
//! by the [`IdKey`] of its current id. Every mutating method updates both
//! structures in the same call; neither is reachable for mutation on its own.
//!
//! The one sanctioned exception is an identity-key collision under
//! [`DuplicateIdPolicy::Overwrite`]: the newer record takes over the index
//! entry while the older one stays in the collection, reachable only by
//! enumeration. [`DuplicateIdPolicy::Reject`] refuses the second insert
//! instead.

use crate::collection::Collection;
use crate::index::RecordIndex;
use mockrecord_core::{DuplicateIdPolicy, Error, IdKey, Identified, IdentityKeyMode, Result, Value};
use tracing::{trace, warn};

/// Storage for one mocked class
#[derive(Debug)]
pub struct ClassStore<R> {
    model: String,
    mode: IdentityKeyMode,
    policy: DuplicateIdPolicy,
    index: RecordIndex<R>,
    collection: Collection<R>,
}

impl<R: Identified> ClassStore<R> {
    /// Create an empty store for `model`
    pub fn new(model: impl Into<String>, mode: IdentityKeyMode, policy: DuplicateIdPolicy) -> Self {
        Self {
            model: model.into(),
            mode,
            policy,
            index: RecordIndex::new(),
            collection: Collection::new(),
        }
    }

    /// Class name this store belongs to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Identity key mode in effect
    pub fn identity_mode(&self) -> IdentityKeyMode {
        self.mode
    }

    /// Derive the index key for an id
    pub fn key_for(&self, id: &Value) -> IdKey {
        IdKey::new(id, self.mode)
    }

    /// Persist a record: append to the collection and index it
    ///
    /// Returns `Ok(false)` without touching anything if the record is
    /// already a member.
    ///
    /// # Errors
    ///
    /// `Error::DuplicateId` when another record holds the key and the
    /// policy is `Reject`.
    pub fn insert(&mut self, record: R) -> Result<bool> {
        if self.collection.contains(&record) {
            return Ok(false);
        }

        let key = self.key_for(&record.record_id());
        if let Some(held) = self.index.get(&key) {
            match self.policy {
                DuplicateIdPolicy::Reject => {
                    return Err(Error::DuplicateId {
                        model: self.model.clone(),
                        key: key.to_string(),
                    });
                }
                DuplicateIdPolicy::Overwrite => {
                    warn!(
                        target: "mockrecord::storage",
                        model = %self.model,
                        key = %key,
                        held_id = %held.record_id(),
                        "Identity key collision, overwriting index entry"
                    );
                }
            }
        }

        trace!(target: "mockrecord::storage", model = %self.model, key = %key, "insert");
        self.collection.push(record.clone());
        self.index.put(key, record);
        Ok(true)
    }

    /// Identity lookup through the index
    pub fn find(&self, id: &Value) -> Option<R> {
        self.index.get(&self.key_for(id)).cloned()
    }

    /// Remove a record from both the collection and the index
    ///
    /// Returns `false` (and changes nothing) if the record is not a member,
    /// so removing the same record twice is harmless.
    pub fn remove(&mut self, record: &R) -> bool {
        if !self.collection.remove(record) {
            return false;
        }
        let key = self.key_for(&record.record_id());
        if self.index.delete_record(&key, record) {
            // A record displaced by a collision gets its key back
            let displaced = self
                .collection
                .iter()
                .rev()
                .find(|r| self.key_for(&r.record_id()) == key)
                .cloned();
            if let Some(displaced) = displaced {
                self.index.put(key.clone(), displaced);
            }
        }
        trace!(target: "mockrecord::storage", model = %self.model, key = %key, "remove");
        true
    }

    /// Remove every record, returning how many were removed
    pub fn clear(&mut self) -> usize {
        self.index.clear();
        self.collection.clear()
    }

    /// Check membership (by identity)
    pub fn contains(&self, record: &R) -> bool {
        self.collection.contains(record)
    }

    /// Clone the record handles in insertion order
    pub fn snapshot(&self) -> Vec<R> {
        self.collection.snapshot()
    }

    /// Borrow the collection
    pub fn collection(&self) -> &Collection<R> {
        &self.collection
    }

    /// Borrow the index
    pub fn index(&self) -> &RecordIndex<R> {
        &self.index
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    /// Verify the index/collection invariant
    ///
    /// Every index entry must be a collection member stored under the key of
    /// its current id, and every member must either own its key or have been
    /// displaced by a colliding record.
    pub fn is_consistent(&self) -> bool {
        let index_ok = self.index.iter().all(|(key, record)| {
            self.collection.contains(record) && *key == self.key_for(&record.record_id())
        });
        let members_ok = self.collection.iter().all(|record| {
            let key = self.key_for(&record.record_id());
            match self.index.get(&key) {
                Some(held) => held.same_record(record) || self.policy == DuplicateIdPolicy::Overwrite,
                None => false,
            }
        });
        index_ok && members_ok
    }
}
