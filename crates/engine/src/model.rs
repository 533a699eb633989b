//! Model: one loaded mocked class and its class-level API
//!
//! ## Design
//!
//! A `Model` owns the class's [`ClassStore`] (collection + record index),
//! its stubbed scopes and instance methods, and the dirty-signal state.
//! Models are created by [`ModelRegistry::load`](crate::ModelRegistry::load)
//! and shared as `Arc<Model>`.
//!
//! ## CRUD Surface
//!
//! - `create` / `create_with` - construct, persist, signal dirty
//! - `find` - identity lookup, `Error::RecordNotFound` on a miss
//! - `find_by` - first match in collection order, `None` on a miss
//! - `delete` / `destroy` - find then remove from collection and index
//! - `find_or_create_by` / `find_or_initialize_by`
//! - `delete_all` / `delete_all_by` and their `destroy_*` aliases
//!
//! ## Concurrency
//!
//! The API is single-writer by contract. Locks make handles `Send + Sync`
//! but `find_or_create_by` is a check-then-act sequence and is not atomic.

use crate::config::MockConfig;
use crate::record::Record;
use crate::registry::ModelRegistry;
use crate::relation::Relation;
use crate::schema::ModelSchema;
use crate::scope::ScopeFn;
use crate::stubs::{MockMethodFn, StubTable};
use mockrecord_core::{AttributeAccess, Attributes, DirtyListener, Error, Result, Value};
use mockrecord_storage::ClassStore;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// A loaded mocked class
pub struct Model {
    schema: Arc<ModelSchema>,
    config: MockConfig,
    store: RwLock<ClassStore<Record>>,
    /// Largest integer id ever stored; the next auto id is one more
    last_id: AtomicI64,
    generation: AtomicU64,
    listeners: RwLock<Vec<Arc<dyn DirtyListener>>>,
    scopes: StubTable<ScopeFn>,
    methods: StubTable<MockMethodFn>,
}

impl Model {
    pub(crate) fn new(schema: ModelSchema, config: MockConfig) -> Self {
        let store = ClassStore::new(schema.name(), config.identity_keys, config.duplicate_ids);
        Self {
            schema: Arc::new(schema),
            config,
            store: RwLock::new(store),
            last_id: AtomicI64::new(0),
            generation: AtomicU64::new(0),
            listeners: RwLock::new(Vec::new()),
            scopes: StubTable::new(),
            methods: StubTable::new(),
        }
    }

    /// Class name
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// Effective class metadata (parent metadata merged in)
    pub fn schema(&self) -> &Arc<ModelSchema> {
        &self.schema
    }

    // ========== Construction and Persistence ==========

    /// Construct an unsaved record
    ///
    /// # Errors
    ///
    /// `Error::UnknownAttribute` for undeclared attributes when strict.
    pub fn new_record(&self, attributes: impl Into<Attributes>) -> Result<Record> {
        Record::build(
            self.schema.clone(),
            &self.config,
            attributes.into(),
        )
    }

    /// Construct an unsaved record and run `init` on it
    pub fn new_record_with<F>(&self, attributes: impl Into<Attributes>, init: F) -> Result<Record>
    where
        F: FnOnce(&Record) -> Result<()>,
    {
        let record = self.new_record(attributes)?;
        init(&record)?;
        Ok(record)
    }

    /// Persist a record: assign an id if it has none, append it to the
    /// collection, index it, and signal dirty
    ///
    /// Returns `Ok(false)` if the record is already persisted here.
    ///
    /// # Errors
    ///
    /// `Error::DuplicateId` when the key is taken and the registry rejects
    /// duplicates, `Error::IdsExhausted` when the next automatic id would
    /// pass `i64::MAX`. Either way the record is left unsaved with its id
    /// unchanged.
    pub fn save(&self, record: &Record) -> Result<bool> {
        let pk = self.schema.primary_key_name();
        {
            let mut store = self.store.write();
            if store.contains(record) {
                return Ok(false);
            }

            let assigned = record.id().is_null();
            if assigned {
                let next = self
                    .last_id
                    .load(Ordering::SeqCst)
                    .checked_add(1)
                    .ok_or_else(|| Error::IdsExhausted {
                        model: self.name().to_string(),
                    })?;
                record.force_attribute(pk, Value::Int(next));
            }
            if let Err(e) = store.insert(record.clone()) {
                if assigned {
                    record.force_attribute(pk, Value::Null);
                }
                return Err(e);
            }
            if let Value::Int(id) = record.id() {
                self.last_id.fetch_max(id, Ordering::SeqCst);
            }
        }

        record.set_persisted(true);
        debug!(target: "mockrecord::model", model = %self.name(), id = %record.id(), "save");
        self.mark_dirty();
        Ok(true)
    }

    /// Construct and persist a record
    pub fn create(&self, attributes: impl Into<Attributes>) -> Result<Record> {
        let record = self.new_record(attributes)?;
        self.save(&record)?;
        Ok(record)
    }

    /// Construct a record, run `init` on it, then persist it
    pub fn create_with<F>(&self, attributes: impl Into<Attributes>, init: F) -> Result<Record>
    where
        F: FnOnce(&Record) -> Result<()>,
    {
        let record = self.new_record_with(attributes, init)?;
        self.save(&record)?;
        Ok(record)
    }

    /// Write attributes on a record and signal dirty
    pub fn update(&self, record: &Record, attributes: &Attributes) -> Result<()> {
        record.assign_attributes(attributes)?;
        self.mark_dirty();
        Ok(())
    }

    // ========== Lookup ==========

    /// Identity lookup through the record index
    ///
    /// # Errors
    ///
    /// `Error::RecordNotFound` when no record has that id.
    pub fn find(&self, id: impl Into<Value>) -> Result<Record> {
        let id = id.into();
        self.store
            .read()
            .find(&id)
            .ok_or_else(|| Error::record_not_found(self.name(), id.stringify()))
    }

    /// Whether a record with that id exists
    pub fn exists(&self, id: impl Into<Value>) -> bool {
        self.store.read().find(&id.into()).is_some()
    }

    /// First record matching the conditions, in collection order
    pub fn find_by(&self, conditions: impl Into<Attributes>) -> Option<Record> {
        let conditions = conditions.into();
        self.store
            .read()
            .collection()
            .iter()
            .find(|r| r.matches(&conditions))
            .cloned()
    }

    /// `find_by`, else `create` with the same attributes
    pub fn find_or_create_by(&self, attributes: impl Into<Attributes>) -> Result<Record> {
        let attributes = attributes.into();
        match self.find_by(attributes.clone()) {
            Some(found) => Ok(found),
            None => self.create(attributes),
        }
    }

    /// `find_by`, else an unsaved record with the same attributes
    pub fn find_or_initialize_by(&self, attributes: impl Into<Attributes>) -> Result<Record> {
        let attributes = attributes.into();
        match self.find_by(attributes.clone()) {
            Some(found) => Ok(found),
            None => self.new_record(attributes),
        }
    }

    // ========== Queries ==========

    /// Relation over the full collection, in insertion order
    pub fn all(&self) -> Relation {
        Relation::new(self.name(), self.store.read().snapshot())
    }

    /// Relation over the records matching every condition
    pub fn where_(&self, conditions: impl Into<Attributes>) -> Relation {
        self.all().where_(conditions)
    }

    /// Same as [`Model::where_`]; the `all(conditions: ...)` form
    pub fn all_where(&self, conditions: impl Into<Attributes>) -> Relation {
        self.where_(conditions)
    }

    /// Number of live records
    pub fn count(&self) -> usize {
        self.store.read().len()
    }

    /// First record in insertion order
    pub fn first(&self) -> Option<Record> {
        self.store.read().collection().iter().next().cloned()
    }

    /// Last record in insertion order
    pub fn last(&self) -> Option<Record> {
        self.store.read().collection().iter().last().cloned()
    }

    // ========== Deletion ==========

    /// Remove a record from the collection and index (instance-level delete)
    ///
    /// Returns `false` without side effects if the record is not a member.
    pub fn remove(&self, record: &Record) -> bool {
        let removed = self.store.write().remove(record);
        if removed {
            record.set_persisted(false);
            debug!(target: "mockrecord::model", model = %self.name(), id = %record.id(), "delete");
            self.mark_dirty();
        }
        removed
    }

    /// Find by id and remove, returning the removed record
    ///
    /// # Errors
    ///
    /// `Error::RecordNotFound` when no record has that id.
    pub fn delete(&self, id: impl Into<Value>) -> Result<Record> {
        let record = self.find(id)?;
        self.remove(&record);
        Ok(record)
    }

    /// Alias of [`Model::delete`]
    pub fn destroy(&self, id: impl Into<Value>) -> Result<Record> {
        self.delete(id)
    }

    /// Remove every record, returning the count
    pub fn delete_all(&self) -> usize {
        let removed = {
            let mut store = self.store.write();
            let records = store.snapshot();
            store.clear();
            records
        };
        for record in &removed {
            record.set_persisted(false);
        }
        debug!(target: "mockrecord::model", model = %self.name(), count = removed.len(), "delete_all");
        self.mark_dirty();
        removed.len()
    }

    /// Remove each record matching the conditions, returning the count
    pub fn delete_all_by(&self, conditions: impl Into<Attributes>) -> usize {
        self.where_(conditions)
            .iter()
            .filter(|record| self.remove(record))
            .count()
    }

    /// Alias of [`Model::delete_all`]
    pub fn destroy_all(&self) -> usize {
        self.delete_all()
    }

    /// Alias of [`Model::delete_all_by`]
    pub fn destroy_all_by(&self, conditions: impl Into<Attributes>) -> usize {
        self.delete_all_by(conditions)
    }

    // ========== Dirty Signal ==========

    /// Signal that state derived from the collection is stale
    pub fn mark_dirty(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let listeners = self.listeners.read().clone();
        for listener in listeners {
            listener.mark_dirty(self.name(), generation);
        }
    }

    /// Number of dirty signals emitted so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Register a receiver for the dirty signal
    pub fn on_dirty(&self, listener: Arc<dyn DirtyListener>) {
        self.listeners.write().push(listener);
    }

    // ========== Scopes ==========

    /// Declare (or redefine) a named scope on this class
    pub fn define_scope<F>(&self, name: impl Into<String>, scope: F)
    where
        F: Fn(&Relation, &[Value]) -> Result<Relation> + Send + Sync + 'static,
    {
        self.scopes.define(name, Arc::new(scope));
    }

    /// Whether this class itself declares the scope
    pub fn has_scope(&self, name: &str) -> bool {
        self.scopes.contains(name)
    }

    /// Scopes declared directly on this class
    pub fn scope_names(&self) -> Vec<String> {
        self.scopes.names()
    }

    /// Invoke a named scope, forwarding to the declaring class if needed
    pub fn scope(&self, registry: &ModelRegistry, name: &str, args: &[Value]) -> Result<Relation> {
        registry.dispatch_scope(self.name(), name, None, args)
    }

    /// Scope-execution entry point; only reached through dispatch
    pub(crate) fn call_scope(&self, name: &str, base: &Relation, args: &[Value]) -> Result<Relation> {
        let scope = self.scopes.get(name).ok_or_else(|| Error::UnknownScope {
            model: self.name().to_string(),
            scope: name.to_string(),
        })?;
        trace!(target: "mockrecord::model", model = %self.name(), scope = %name, "call_scope");
        scope(base, args)
    }

    // ========== Mock Methods ==========

    /// Install (or replace) a stubbed instance method
    pub fn stub_method<F>(&self, name: impl Into<String>, method: F)
    where
        F: Fn(&Record, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.methods.define(name, Arc::new(method));
    }

    /// Whether this class itself stubs the method
    pub fn has_stubbed_method(&self, name: &str) -> bool {
        self.methods.contains(name)
    }

    /// Invoke a stubbed instance method, nearest class in the hierarchy first
    ///
    /// # Errors
    ///
    /// `Error::NotStubbed` if no class in the hierarchy stubs the method.
    pub fn call_mock_method(
        &self,
        registry: &ModelRegistry,
        record: &Record,
        name: &str,
        args: &[Value],
    ) -> Result<Value> {
        let method = registry
            .lineage(self.name())?
            .iter()
            .find_map(|model| model.methods.get(name))
            .ok_or_else(|| Error::NotStubbed {
                model: self.name().to_string(),
                method: name.to_string(),
            })?;
        method(record, args)
    }

    // ========== Lifecycle ==========

    /// Drop every record and stub, and restart id allocation
    ///
    /// Scope declarations and dirty listeners are kept.
    pub fn reset(&self) {
        let removed = self.delete_all();
        self.methods.clear();
        self.last_id.store(0, Ordering::SeqCst);
        debug!(target: "mockrecord::model", model = %self.name(), removed, "reset");
    }

    /// Check the collection/index invariant
    pub fn is_consistent(&self) -> bool {
        self.store.read().is_consistent()
    }

    /// Read the attribute every record uses as its id
    pub fn primary_key(&self) -> &str {
        self.schema.primary_key_name()
    }

    /// Id of a record as this class sees it
    pub fn id_of(&self, record: &Record) -> Value {
        record.read_attribute(self.primary_key())
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name())
            .field("count", &self.count())
            .field("generation", &self.generation())
            .field("scopes", &self.scopes)
            .field("methods", &self.methods)
            .finish()
    }
}
