//! Class-level mock engine for mockrecord
//!
//! This crate builds the record-facing API on top of the storage layer:
//! - ModelRegistry: loaded classes by name, config, reset lifecycle
//! - Model: per-class CRUD surface, stubbed scopes and methods
//! - Record: attribute access, identity, persisted state
//! - Relation: immutable chainable views over records
//! - Association: memoized has-many links between records
//! - Scope dispatch: named scopes routed to the declaring class
//!
//! The engine is the only component that knows about:
//! - Class hierarchies (parent lookup by name)
//! - Id allocation
//! - The dirty signal emitted on mutation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod association;
pub mod config;
pub mod model;
pub mod record;
pub mod registry;
pub mod relation;
pub mod schema;
pub mod scope;
pub mod stubs;

pub use association::Association;
pub use config::MockConfig;
pub use model::Model;
pub use record::Record;
pub use registry::ModelRegistry;
pub use relation::Relation;
pub use schema::{AssociationDef, ModelSchema, DEFAULT_PRIMARY_KEY};
pub use scope::ScopeFn;
pub use stubs::{MockMethodFn, StubTable};

pub use mockrecord_core::{
    AttributeAccess, Attributes, DirtyListener, DuplicateIdPolicy, Error, IdKey, IdentityKeyMode,
    Result, Value,
};
