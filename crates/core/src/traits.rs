//! Capability traits shared by the storage and engine layers
//!
//! - AttributeAccess: read/write primitives every record-like type provides
//! - Identified: what the record index needs to key and compare records
//! - DirtyListener: receiver of the "derived state is stale" signal

use crate::error::Result;
use crate::value::Value;

/// Attribute storage primitives
///
/// Queries only ever go through this interface, so they are independent of
/// how a record physically stores its attributes.
pub trait AttributeAccess {
    /// Read an attribute; unset attributes read as `Value::Null`
    fn read_attribute(&self, name: &str) -> Value;

    /// Write an attribute
    ///
    /// # Errors
    ///
    /// Implementations may reject unknown attribute names or writes that
    /// would break an invariant (such as changing a persisted id).
    fn write_attribute(&self, name: &str, value: Value) -> Result<()>;
}

/// Record identity as seen by the record index
pub trait Identified: Clone {
    /// Current id value (may be `Value::Null` before the record is saved)
    fn record_id(&self) -> Value;

    /// Whether two handles refer to the same record (identity, not content)
    fn same_record(&self, other: &Self) -> bool;
}

/// Receiver for the mark-dirty signal emitted on every collection mutation
///
/// An external caching layer implements this to drop aggregates computed
/// over a class's collection. The store only emits the signal.
pub trait DirtyListener: Send + Sync {
    /// Called after the collection of `model` changed
    fn mark_dirty(&self, model: &str, generation: u64);
}
