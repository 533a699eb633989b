//! Class metadata for mocked models
//!
//! A `ModelSchema` describes one mocked class: its name, optional parent
//! class, primary key, declared attributes (with defaults) and has-many
//! associations. Records keep an `Arc<ModelSchema>` as their back-reference
//! to the owning class.

use mockrecord_core::{Attributes, Value};

/// Default primary key attribute name
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Declared has-many association
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationDef {
    /// Accessor name on the owner (e.g. `accounts`)
    pub name: String,
    /// Target class name, resolved through the registry
    pub target: String,
    /// Attribute on the target holding the owner's id
    pub foreign_key: String,
}

/// Metadata for one mocked class
///
/// # Example
///
/// ```ignore
/// let schema = ModelSchema::new("ChildModel")
///     .parent("User")
///     .attribute("nickname", Value::Null)
///     .has_many("accounts", "Account", "child_model_id");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
    name: String,
    parent: Option<String>,
    primary_key: String,
    attributes: Vec<(String, Value)>,
    associations: Vec<AssociationDef>,
}

impl ModelSchema {
    /// Start a schema for `name` with only the primary key declared
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            attributes: vec![(DEFAULT_PRIMARY_KEY.to_string(), Value::Null)],
            associations: Vec::new(),
        }
    }

    /// Declare the parent class
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Use a different primary key attribute
    pub fn primary_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.attributes
            .retain(|(name, default)| !(name == &self.primary_key && default.is_null()));
        self.primary_key = key.clone();
        self.push_attribute(key, Value::Null);
        self
    }

    /// Declare an attribute with its default value
    pub fn attribute(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.push_attribute(name.into(), default.into());
        self
    }

    /// Declare a has-many association
    pub fn has_many(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.push_association(AssociationDef {
            name: name.into(),
            target: target.into(),
            foreign_key: foreign_key.into(),
        });
        self
    }

    fn push_attribute(&mut self, name: String, default: Value) {
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = default,
            None => self.attributes.push((name, default)),
        }
    }

    fn push_association(&mut self, def: AssociationDef) {
        match self.associations.iter_mut().find(|a| a.name == def.name) {
            Some(slot) => *slot = def,
            None => self.associations.push(def),
        }
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent class name, if any
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Primary key attribute name
    pub fn primary_key_name(&self) -> &str {
        &self.primary_key
    }

    /// Declared attribute names in declaration order
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|(name, _)| name.as_str())
    }

    /// Whether `name` is a declared attribute
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|(n, _)| n == name)
    }

    /// Attribute defaults for a fresh record
    pub fn default_attributes(&self) -> Attributes {
        self.attributes.iter().cloned().collect()
    }

    /// Declared associations
    pub fn associations(&self) -> &[AssociationDef] {
        &self.associations
    }

    /// Look up an association by accessor name
    pub fn association(&self, name: &str) -> Option<&AssociationDef> {
        self.associations.iter().find(|a| a.name == name)
    }

    /// Merge inherited metadata from the parent's effective schema
    ///
    /// Parent attributes and associations come first; anything the child
    /// declares itself wins. The child keeps its own primary key.
    pub fn inherit(&self, parent: &ModelSchema) -> ModelSchema {
        let mut merged = ModelSchema {
            name: self.name.clone(),
            parent: self.parent.clone(),
            primary_key: self.primary_key.clone(),
            attributes: parent.attributes.clone(),
            associations: parent.associations.clone(),
        };
        for (name, default) in &self.attributes {
            merged.push_attribute(name.clone(), default.clone());
        }
        for def in &self.associations {
            merged.push_association(def.clone());
        }
        merged
    }
}
