//! Core types for the record store
//!
//! This module defines:
//! - Attributes: ordered attribute-name → Value mapping (also used as query conditions)
//! - IdKey: index key derived from a record id
//! - IdentityKeyMode: how ids are turned into index keys
//! - DuplicateIdPolicy: what happens when two live records share an index key

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// Attribute name → value mapping
///
/// Ordered by attribute name so that debug output, stringification and
/// iteration are deterministic. Conditions passed to `where`/`find_by` use
/// the same type.
///
/// # Example
///
/// ```
/// use mockrecord_core::{Attributes, Value};
///
/// let attrs = Attributes::from([("name", Value::from("Alice")), ("credits", Value::from(10))]);
/// assert_eq!(attrs.get("credits"), Some(&Value::Int(10)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    values: BTreeMap<String, Value>,
}

impl Attributes {
    /// Create an empty attribute set
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace an attribute, returning the previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Get an attribute value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Remove an attribute
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Check whether an attribute is present
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no attributes
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate attributes in name order
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.values.iter()
    }

    /// Attribute names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Overwrite entries with those from `other`
    pub fn merge(&mut self, other: &Attributes) {
        for (name, value) in other.iter() {
            self.values.insert(name.clone(), value.clone());
        }
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Attributes {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Attributes {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// How record ids map to index keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityKeyMode {
    /// Key on the canonical string form only (`Int(1)` and `String("1")` collide)
    #[default]
    Stringified,
    /// Key on the string form plus the value's type
    Typed,
}

/// Behavior when a newly saved record's key is already held by another record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateIdPolicy {
    /// The new record replaces the old one in the index (the old one stays in the collection)
    #[default]
    Overwrite,
    /// The save fails with `Error::DuplicateId`
    Reject,
}

/// Identity key for the record index
///
/// Derived from a record id through [`Value::stringify`]. Under
/// [`IdentityKeyMode::Typed`] the value's type name is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdKey {
    type_tag: Option<&'static str>,
    text: String,
}

impl IdKey {
    /// Derive the key for an id
    pub fn new(id: &Value, mode: IdentityKeyMode) -> Self {
        let type_tag = match mode {
            IdentityKeyMode::Stringified => None,
            IdentityKeyMode::Typed => Some(id.type_name()),
        };
        Self {
            type_tag,
            text: id.stringify(),
        }
    }

    /// The stringified id
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The id's type name, when keys are typed
    pub fn type_tag(&self) -> Option<&'static str> {
        self.type_tag
    }
}

impl fmt::Display for IdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_tag {
            Some(tag) => write!(f, "{}:{}", tag, self.text),
            None => f.write_str(&self.text),
        }
    }
}
