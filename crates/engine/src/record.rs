//! Record: one in-memory entity standing in for a persisted row
//!
//! A `Record` is a cheap, clonable handle. Clones refer to the same record;
//! identity is handle identity, never attribute equality. The record keeps a
//! back-reference to its class metadata (`ModelSchema`), not to the
//! collection that owns it, so collection-level operations take the
//! registry explicitly.
//!
//! ## Invariants
//!
//! - Once persisted, the primary key cannot be changed (`Error::ImmutableId`).
//! - The association cache is an explicit per-record slot: an entry is
//!   computed once and replaced wholesale on assignment.

use crate::association::Association;
use crate::config::MockConfig;
use crate::registry::ModelRegistry;
use crate::schema::ModelSchema;
use mockrecord_core::{
    AttributeAccess, Attributes, Error, IdKey, Identified, IdentityKeyMode, Result, Value,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Handle to a mocked record
#[derive(Clone)]
pub struct Record {
    inner: Arc<RecordInner>,
}

struct RecordInner {
    schema: Arc<ModelSchema>,
    strict: bool,
    identity_mode: IdentityKeyMode,
    state: RwLock<RecordState>,
}

struct RecordState {
    attributes: Attributes,
    persisted: bool,
    associations: HashMap<String, Association>,
}

impl Record {
    /// Construct an unsaved record from schema defaults plus `attributes`
    pub(crate) fn build(
        schema: Arc<ModelSchema>,
        config: &MockConfig,
        attributes: Attributes,
    ) -> Result<Self> {
        let strict = config.strict_attributes;
        let mut values = schema.default_attributes();
        for (name, value) in attributes {
            if strict && !schema.has_attribute(&name) {
                return Err(Error::UnknownAttribute {
                    model: schema.name().to_string(),
                    attribute: name,
                });
            }
            values.insert(name, value);
        }

        Ok(Self {
            inner: Arc::new(RecordInner {
                schema,
                strict,
                identity_mode: config.identity_keys,
                state: RwLock::new(RecordState {
                    attributes: values,
                    persisted: false,
                    associations: HashMap::new(),
                }),
            }),
        })
    }

    /// Name of the class this record belongs to
    pub fn model_name(&self) -> &str {
        self.inner.schema.name()
    }

    /// Class metadata
    pub fn schema(&self) -> &Arc<ModelSchema> {
        &self.inner.schema
    }

    /// Primary key value (`Value::Null` until saved or assigned)
    pub fn id(&self) -> Value {
        self.read_attribute(self.inner.schema.primary_key_name())
    }

    /// Index key of the current id, under the class's identity key mode
    ///
    /// Two ids denote the same record exactly when their keys are equal,
    /// so `Int(1)` and `String("1")` match unless keys are typed.
    pub fn id_key(&self) -> IdKey {
        IdKey::new(&self.id(), self.inner.identity_mode)
    }

    /// Whether `id` names this record under the class's identity key mode
    pub fn has_id(&self, id: &Value) -> bool {
        self.id_key() == IdKey::new(id, self.inner.identity_mode)
    }

    /// Snapshot of all attribute values
    pub fn attributes(&self) -> Attributes {
        self.inner.state.read().attributes.clone()
    }

    /// Whether the record is a member of its class's collection
    pub fn is_persisted(&self) -> bool {
        self.inner.state.read().persisted
    }

    /// Whether the record has never been saved (or was deleted)
    pub fn is_new_record(&self) -> bool {
        !self.is_persisted()
    }

    /// Identity comparison
    pub fn same_record(&self, other: &Record) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether every condition matches this record's attributes
    ///
    /// Each condition is an equality test. An `Array` condition against a
    /// non-array attribute is a membership test instead.
    pub fn matches(&self, conditions: &Attributes) -> bool {
        let state = self.inner.state.read();
        conditions.iter().all(|(name, expected)| {
            let actual = state.attributes.get(name).unwrap_or(&Value::Null);
            match (expected, actual) {
                (Value::Array(options), actual) if !matches!(actual, Value::Array(_)) => {
                    options.iter().any(|option| option == actual)
                }
                _ => expected == actual,
            }
        })
    }

    /// Write several attributes, stopping at the first rejected write
    pub fn assign_attributes(&self, attributes: &Attributes) -> Result<()> {
        for (name, value) in attributes {
            self.write_attribute(name, value.clone())?;
        }
        Ok(())
    }

    /// Remove this record from its class (instance-level delete)
    ///
    /// Returns `Ok(false)` if the record was not a member, so deleting
    /// twice is a no-op.
    pub fn delete(&self, registry: &ModelRegistry) -> Result<bool> {
        Ok(registry.resolve(self.model_name())?.remove(self))
    }

    /// Alias of [`Record::delete`]
    pub fn destroy(&self, registry: &ModelRegistry) -> Result<bool> {
        self.delete(registry)
    }

    /// Write attributes and signal the class that derived state is stale
    pub fn update(&self, registry: &ModelRegistry, attributes: &Attributes) -> Result<()> {
        registry.resolve(self.model_name())?.update(self, attributes)
    }

    /// Invoke a stubbed instance method, searching up the class hierarchy
    pub fn call_mock_method(
        &self,
        registry: &ModelRegistry,
        method: &str,
        args: &[Value],
    ) -> Result<Value> {
        registry
            .resolve(self.model_name())?
            .call_mock_method(registry, self, method, args)
    }

    pub(crate) fn set_persisted(&self, persisted: bool) {
        self.inner.state.write().persisted = persisted;
    }

    /// Overwrite an attribute without strictness or id checks
    pub(crate) fn force_attribute(&self, name: &str, value: Value) {
        self.inner.state.write().attributes.insert(name, value);
    }

    pub(crate) fn cached_association(&self, name: &str) -> Option<Association> {
        self.inner.state.read().associations.get(name).cloned()
    }

    pub(crate) fn cache_association(&self, name: &str, association: Association) {
        self.inner
            .state
            .write()
            .associations
            .insert(name.to_string(), association);
    }

    pub(crate) fn drop_cached_association(&self, name: &str) {
        self.inner.state.write().associations.remove(name);
    }
}

impl AttributeAccess for Record {
    fn read_attribute(&self, name: &str) -> Value {
        self.inner
            .state
            .read()
            .attributes
            .get(name)
            .cloned()
            .unwrap_or(Value::Null)
    }

    fn write_attribute(&self, name: &str, value: Value) -> Result<()> {
        let schema = &self.inner.schema;
        if self.inner.strict && !schema.has_attribute(name) {
            return Err(Error::UnknownAttribute {
                model: schema.name().to_string(),
                attribute: name.to_string(),
            });
        }

        let mut state = self.inner.state.write();
        if name == schema.primary_key_name() && state.persisted {
            let current = state.attributes.get(name).unwrap_or(&Value::Null);
            if *current != value {
                return Err(Error::ImmutableId {
                    model: schema.name().to_string(),
                });
            }
        }
        state.attributes.insert(name, value);
        Ok(())
    }
}

impl Identified for Record {
    fn record_id(&self) -> Value {
        self.id()
    }

    fn same_record(&self, other: &Self) -> bool {
        Record::same_record(self, other)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.same_record(other)
    }
}

impl Eq for Record {}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("Record")
            .field("model", &self.model_name())
            .field("persisted", &state.persisted)
            .field("attributes", &state.attributes)
            .finish()
    }
}
