//! mockrecord - in-memory stand-ins for database-backed record classes
//!
//! Each mocked class keeps an ordered collection of live records plus an
//! identity index, and exposes the familiar class-level surface on top of
//! it: `create`, `find`, `find_by`, `where_`, `delete_all`, named scopes
//! and has-many associations.
//!
//! # Quick Start
//!
//! ```
//! use mockrecord::{AttributeAccess, ModelRegistry, ModelSchema, Value};
//!
//! let registry = ModelRegistry::new();
//! let users = registry
//!     .load(ModelSchema::new("User").attribute("credits", 0))
//!     .unwrap();
//!
//! let user = users.create([("credits", 5)]).unwrap();
//! assert!(users.find(user.id()).unwrap().same_record(&user));
//! assert_eq!(users.where_([("credits", 5)]).len(), 1);
//! assert_eq!(user.read_attribute("credits"), Value::Int(5));
//! ```
//!
//! # Architecture
//!
//! - `mockrecord-core`: values, attributes, identity keys, errors
//! - `mockrecord-storage`: per-class index and collection
//! - `mockrecord-engine`: records, relations, associations, scopes, registry
//!
//! Everything public is re-exported from the engine.

pub use mockrecord_engine::*;

/// Storage layer types, for callers building their own record stores
pub mod storage {
    pub use mockrecord_storage::{ClassStore, Collection, RecordIndex};
}
