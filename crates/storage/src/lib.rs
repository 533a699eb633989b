//! Storage layer for mockrecord
//!
//! This crate implements the per-class in-memory storage:
//! - RecordIndex: IdKey → record map for O(1) identity lookup
//! - Collection: ordered sequence of live records (insertion order)
//! - ClassStore: the two kept synchronized under insert/remove/clear
//!
//! Storage is generic over any [`Identified`](mockrecord_core::Identified)
//! record handle; the engine plugs in its `Record` type.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod index;
pub mod store;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use collection::Collection;
pub use index::RecordIndex;
pub use store::ClassStore;
