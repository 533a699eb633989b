//! Per-class tables of stubbed behavior
//!
//! Mocked classes have no real method bodies. Tests install closures for
//! named scopes and instance methods, and calls are routed to them by name.

use crate::record::Record;
use mockrecord_core::{Result, Value};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Stubbed instance method: receives the record and call arguments
pub type MockMethodFn = Arc<dyn Fn(&Record, &[Value]) -> Result<Value> + Send + Sync>;

/// Name → stub table
///
/// Lookups clone the stored `Arc` out so the table lock is never held
/// while a stub runs (stubs are free to call back into the registry).
pub struct StubTable<F> {
    entries: RwLock<HashMap<String, F>>,
}

impl<F: Clone> StubTable<F> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Install or replace a stub
    pub fn define(&self, name: impl Into<String>, stub: F) {
        self.entries.write().insert(name.into(), stub);
    }

    /// Fetch a stub by name
    pub fn get(&self, name: &str) -> Option<F> {
        self.entries.read().get(name).cloned()
    }

    /// Whether a stub is installed under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Remove a stub
    pub fn remove(&self, name: &str) -> Option<F> {
        self.entries.write().remove(name)
    }

    /// Installed names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Remove every stub
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of installed stubs
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<F: Clone> Default for StubTable<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> std::fmt::Debug for StubTable<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        f.debug_struct("StubTable").field("names", &names).finish()
    }
}
