//! Testing utilities for the storage layer
//!
//! - **TestRecord**: Minimal `Identified` record handle with a fixed id
//! - **Reference Model**: Plain model of expected live ids
//!
//! # Example
//!
//! ```ignore
//! use mockrecord_storage::testing::TestRecord;
//!
//! let a = TestRecord::new(1);
//! let b = TestRecord::new(1);
//! assert!(!a.same_record(&b));
//! ```

mod reference_model;

pub use reference_model::{Operation, ReferenceModel};

use mockrecord_core::{Identified, Value};
use std::sync::Arc;

/// Record handle for storage tests
///
/// Two handles are the same record only if one was cloned from the other.
#[derive(Debug, Clone)]
pub struct TestRecord {
    /// The record's id
    pub id: Value,
    identity: Arc<()>,
}

impl TestRecord {
    /// Create a new record with the given id
    pub fn new(id: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            identity: Arc::new(()),
        }
    }
}

impl Identified for TestRecord {
    fn record_id(&self) -> Value {
        self.id.clone()
    }

    fn same_record(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.identity, &other.identity)
    }
}
