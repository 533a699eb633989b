//! Registry of loaded mocked classes
//!
//! Classes are loaded from a [`ModelSchema`] and looked up by name. The
//! registry is an explicit value passed to the operations that resolve
//! classes by name (scope dispatch, association materialization,
//! instance-level delete), so separate test cases can hold separate
//! registries.
//!
//! ## Inheritance
//!
//! A schema naming a parent is merged with the parent's effective schema
//! at load time, so the parent must already be loaded. Scope and stub
//! resolution walk [`ModelRegistry::lineage`] at call time.

use crate::config::MockConfig;
use crate::model::Model;
use crate::schema::ModelSchema;
use mockrecord_core::{Error, Result};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Name → loaded class
pub struct ModelRegistry {
    config: MockConfig,
    models: RwLock<HashMap<String, Arc<Model>>>,
}

impl ModelRegistry {
    /// Create an empty registry with default configuration
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    /// Create an empty registry
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            models: RwLock::new(HashMap::new()),
        }
    }

    /// Configuration applied to every class loaded here
    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Load a class, replacing any previous definition with the same name
    ///
    /// Records of a replaced definition are dropped with it.
    ///
    /// # Errors
    ///
    /// `Error::UnknownModel` if the schema names a parent that is not loaded.
    pub fn load(&self, schema: ModelSchema) -> Result<Arc<Model>> {
        let schema = match schema.parent_name().map(str::to_string) {
            Some(parent) => {
                let parent = self.resolve(&parent)?;
                schema.inherit(parent.schema())
            }
            None => schema,
        };

        let name = schema.name().to_string();
        let model = Arc::new(Model::new(schema, self.config));
        let replaced = self
            .models
            .write()
            .insert(name.clone(), model.clone())
            .is_some();
        debug!(target: "mockrecord::registry", model = %name, replaced, "load");
        Ok(model)
    }

    /// Look up a loaded class
    ///
    /// # Errors
    ///
    /// `Error::UnknownModel` if no class with that name is loaded.
    pub fn resolve(&self, name: &str) -> Result<Arc<Model>> {
        self.get(name)
            .ok_or_else(|| Error::UnknownModel(name.to_string()))
    }

    /// Look up a loaded class, `None` if absent
    pub fn get(&self, name: &str) -> Option<Arc<Model>> {
        self.models.read().get(name).cloned()
    }

    /// Whether a class with that name is loaded
    pub fn is_loaded(&self, name: &str) -> bool {
        self.models.read().contains_key(name)
    }

    /// Loaded class names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of loaded classes
    pub fn len(&self) -> usize {
        self.models.read().len()
    }

    /// Check if nothing is loaded
    pub fn is_empty(&self) -> bool {
        self.models.read().is_empty()
    }

    /// `name` followed by its ancestors, nearest first
    ///
    /// Stops at the first ancestor that repeats, so a parent cycle created
    /// by reloading cannot loop forever.
    ///
    /// # Errors
    ///
    /// `Error::UnknownModel` if `name` or any ancestor is not loaded.
    pub fn lineage(&self, name: &str) -> Result<Vec<Arc<Model>>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(name.to_string());

        while let Some(class) = current {
            if !seen.insert(class.clone()) {
                break;
            }
            let model = self.resolve(&class)?;
            current = model.schema().parent_name().map(str::to_string);
            chain.push(model);
        }
        Ok(chain)
    }

    /// Reset every loaded class: drop records and stubbed methods, restart ids
    ///
    /// Class definitions and declared scopes are kept.
    pub fn reset_all(&self) {
        let models: Vec<Arc<Model>> = self.models.read().values().cloned().collect();
        for model in models {
            model.reset();
        }
        debug!(target: "mockrecord::registry", "reset_all");
    }

    /// Unload one class, returning it if it was loaded
    pub fn unload(&self, name: &str) -> Option<Arc<Model>> {
        let removed = self.models.write().remove(name);
        if removed.is_some() {
            debug!(target: "mockrecord::registry", model = %name, "unload");
        }
        removed
    }

    /// Unload every class
    pub fn unload_all(&self) {
        self.models.write().clear();
        debug!(target: "mockrecord::registry", "unload_all");
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("config", &self.config)
            .field("models", &self.names())
            .finish()
    }
}
