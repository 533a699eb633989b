//! Core types and traits for mockrecord
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: Unified value enum for mocked attributes
//! - Attributes: Attribute-name → Value mapping (also used as query conditions)
//! - IdKey: Identity key derived from a record id
//! - IdentityKeyMode / DuplicateIdPolicy: identity key behavior knobs
//! - Error: Error type hierarchy
//! - Traits: AttributeAccess, Identified, DirtyListener

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use traits::{AttributeAccess, DirtyListener, Identified};
pub use types::{Attributes, DuplicateIdPolicy, IdKey, IdentityKeyMode};
pub use value::Value;
