//! Has-many associations between an owner record and a target class
//!
//! ## Memoization
//!
//! The first call to [`Record::association`] resolves the target class
//! through the registry, filters its collection for records whose foreign
//! key equals the owner's id, and stores the result in the owner's
//! association slot. Later calls return the stored value without scanning
//! again, even if the target collection changed in the meantime.
//!
//! Every mutating accessor (`set_association`, `push_associated`,
//! `build_associated`, `create_associated`) replaces the stored association
//! wholesale with a new value bound to the same foreign key.
//! [`Record::reload_association`] drops the slot and materializes again.

use crate::record::Record;
use crate::registry::ModelRegistry;
use crate::relation::Relation;
use crate::schema::AssociationDef;
use mockrecord_core::{AttributeAccess, Attributes, Error, Result, Value};
use std::sync::Arc;
use tracing::trace;

/// Materialized one-to-many link
#[derive(Clone, Debug)]
pub struct Association {
    name: Arc<str>,
    foreign_key: Arc<str>,
    foreign_id: Value,
    records: Relation,
}

impl Association {
    fn bind(def: &AssociationDef, foreign_id: Value, records: Vec<Record>) -> Self {
        Self {
            name: def.name.as_str().into(),
            foreign_key: def.foreign_key.as_str().into(),
            foreign_id,
            records: Relation::new(def.target.as_str(), records),
        }
    }

    fn appended(&self, record: Record) -> Self {
        let mut records = self.records.to_vec();
        records.push(record);
        Self {
            name: self.name.clone(),
            foreign_key: self.foreign_key.clone(),
            foreign_id: self.foreign_id.clone(),
            records: Relation::new(self.target(), records),
        }
    }

    /// Accessor name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target class name
    pub fn target(&self) -> &str {
        self.records.model().unwrap_or_default()
    }

    /// Foreign key attribute on the target records
    pub fn foreign_key(&self) -> &str {
        &self.foreign_key
    }

    /// The owner's id the foreign key is bound to
    pub fn foreign_id(&self) -> &Value {
        &self.foreign_id
    }

    /// The associated records as a relation (chainable, scope-aware)
    pub fn relation(&self) -> &Relation {
        &self.records
    }

    /// Borrow the associated records
    pub fn records(&self) -> &[Record] {
        self.records.records()
    }

    /// Clone the associated record handles
    pub fn to_vec(&self) -> Vec<Record> {
        self.records.to_vec()
    }

    /// Number of associated records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if there are no associated records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether `record` (by identity) is associated
    pub fn contains(&self, record: &Record) -> bool {
        self.records.contains(record)
    }

    /// Iterate the associated records
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Association {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl Record {
    fn association_def(&self, name: &str) -> Result<AssociationDef> {
        self.schema()
            .association(name)
            .cloned()
            .ok_or_else(|| Error::UnknownAssociation {
                model: self.model_name().to_string(),
                association: name.to_string(),
            })
    }

    /// Read a has-many association, materializing it on first access
    ///
    /// An owner without an id has no associated records.
    ///
    /// # Errors
    ///
    /// `Error::UnknownAssociation` if the class declares no such
    /// association, `Error::UnknownModel` if the target class is not loaded.
    pub fn association(&self, registry: &ModelRegistry, name: &str) -> Result<Association> {
        if let Some(cached) = self.cached_association(name) {
            return Ok(cached);
        }

        let def = self.association_def(name)?;
        let owner_id = self.id();
        let records = if owner_id.is_null() {
            Vec::new()
        } else {
            registry
                .resolve(&def.target)?
                .where_(Attributes::new().with(def.foreign_key.clone(), owner_id.clone()))
                .to_vec()
        };
        trace!(
            target: "mockrecord::association",
            owner = %self.model_name(),
            association = %name,
            matched = records.len(),
            "materialize"
        );

        let association = Association::bind(&def, owner_id, records);
        self.cache_association(name, association.clone());
        Ok(association)
    }

    /// Replace the association's contents
    ///
    /// Each assigned record has its foreign key set to the owner's id.
    ///
    /// # Errors
    ///
    /// Propagates a rejected foreign-key write.
    pub fn set_association(&self, name: &str, records: Vec<Record>) -> Result<Association> {
        let def = self.association_def(name)?;
        let owner_id = self.id();
        for record in &records {
            record.write_attribute(&def.foreign_key, owner_id.clone())?;
        }

        let association = Association::bind(&def, owner_id, records);
        self.cache_association(name, association.clone());
        Ok(association)
    }

    /// Append an existing record, binding its foreign key to the owner
    pub fn push_associated(
        &self,
        registry: &ModelRegistry,
        name: &str,
        record: Record,
    ) -> Result<Association> {
        let current = self.association(registry, name)?;
        record.write_attribute(current.foreign_key(), self.id())?;
        if current.contains(&record) {
            return Ok(current);
        }

        let association = current.appended(record);
        self.cache_association(name, association.clone());
        Ok(association)
    }

    /// Construct an unsaved target record bound to the owner and append it
    pub fn build_associated(
        &self,
        registry: &ModelRegistry,
        name: &str,
        attributes: impl Into<Attributes>,
    ) -> Result<Record> {
        let current = self.association(registry, name)?;
        let target = registry.resolve(current.target())?;
        let attributes = attributes
            .into()
            .with(current.foreign_key(), self.id());

        let record = target.new_record(attributes)?;
        self.cache_association(name, current.appended(record.clone()));
        Ok(record)
    }

    /// Create a target record bound to the owner and append it
    pub fn create_associated(
        &self,
        registry: &ModelRegistry,
        name: &str,
        attributes: impl Into<Attributes>,
    ) -> Result<Record> {
        let current = self.association(registry, name)?;
        let target = registry.resolve(current.target())?;
        let attributes = attributes
            .into()
            .with(current.foreign_key(), self.id());

        let record = target.create(attributes)?;
        self.cache_association(name, current.appended(record.clone()));
        Ok(record)
    }

    /// Drop the memoized association and materialize it again
    pub fn reload_association(&self, registry: &ModelRegistry, name: &str) -> Result<Association> {
        self.association_def(name)?;
        self.drop_cached_association(name);
        self.association(registry, name)
    }
}
