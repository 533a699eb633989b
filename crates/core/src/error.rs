//! Error types for the mocked record store
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Lookup failures are local and synchronous: nothing in the store retries,
//! and no error is fatal to the process. `find_by` style lookups signal
//! absence with `None` instead of an error.

use thiserror::Error;

/// Result type alias for record store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the mocked record store
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// No record with the given id exists in the class's collection
    #[error("Couldn't find {model} with 'id'={id}")]
    RecordNotFound {
        /// Class name
        model: String,
        /// Stringified id that was looked up
        id: String,
    },

    /// Another live record already holds the index key (reject policy only)
    #[error("Duplicate id {key} for {model}")]
    DuplicateId {
        /// Class name
        model: String,
        /// The colliding index key
        key: String,
    },

    /// The class name is not present in the model registry
    #[error("Model {0} is not loaded")]
    UnknownModel(String),

    /// No class in the hierarchy declares the scope
    #[error("Undefined scope '{scope}' for {model}")]
    UnknownScope {
        /// Class the scope was invoked on
        model: String,
        /// Scope name
        scope: String,
    },

    /// The class declares no association with this name
    #[error("Undefined association '{association}' for {model}")]
    UnknownAssociation {
        /// Class name
        model: String,
        /// Association name
        association: String,
    },

    /// The attribute is not declared on the class (strict attributes only)
    #[error("unknown attribute '{attribute}' for {model}")]
    UnknownAttribute {
        /// Class name
        model: String,
        /// Attribute name
        attribute: String,
    },

    /// Attempt to change the id of a record that is already persisted
    #[error("Cannot change the id of a persisted {model} record")]
    ImmutableId {
        /// Class name
        model: String,
    },

    /// Automatic id allocation ran past `i64::MAX`
    #[error("No ids left to allocate for {model}")]
    IdsExhausted {
        /// Class name
        model: String,
    },

    /// A mocked method was invoked without a stubbed implementation
    #[error("{model}#{method} is not implemented for the mock; stub it before calling")]
    NotStubbed {
        /// Class name
        model: String,
        /// Method name
        method: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Construct a `RecordNotFound` error
    pub fn record_not_found(model: impl Into<String>, id: impl Into<String>) -> Self {
        Error::RecordNotFound {
            model: model.into(),
            id: id.into(),
        }
    }

    /// Check if this is a `RecordNotFound` error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::RecordNotFound { .. })
    }
}
