//! Shared fixtures for the mock_api suite.
//!
//! Import via `mod common;` from main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::{Arc, Once};
pub use mockrecord::{
    AttributeAccess, Attributes, DuplicateIdPolicy, Error, IdentityKeyMode, MockConfig, Model,
    ModelRegistry, ModelSchema, Record, Relation, Value,
};

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Route `mockrecord::*` events to the test output (`RUST_LOG` aware)
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Fixture registry
// ============================================================================

/// Registry with the standard fixture classes loaded:
///
/// - `User` (name, credits), has_many accounts via `user_id`
/// - `ChildModel` extends `User`, has_many accounts via `child_model_id`
/// - `Account` (user_id, child_model_id, balance)
pub fn fixture_registry() -> ModelRegistry {
    fixture_registry_with(MockConfig::default())
}

/// Fixture registry with a custom config
pub fn fixture_registry_with(config: MockConfig) -> ModelRegistry {
    init_tracing();
    let registry = ModelRegistry::with_config(config);
    registry
        .load(
            ModelSchema::new("User")
                .attribute("name", Value::Null)
                .attribute("credits", 0)
                .has_many("accounts", "Account", "user_id"),
        )
        .expect("load User");
    registry
        .load(
            ModelSchema::new("ChildModel")
                .parent("User")
                .has_many("accounts", "Account", "child_model_id"),
        )
        .expect("load ChildModel");
    registry
        .load(
            ModelSchema::new("Account")
                .attribute("user_id", Value::Null)
                .attribute("child_model_id", Value::Null)
                .attribute("balance", 0),
        )
        .expect("load Account");
    registry
}

/// Resolve a fixture class
pub fn model(registry: &ModelRegistry, name: &str) -> Arc<Model> {
    registry.resolve(name).expect("fixture class loaded")
}

/// Declare `by_credits(n)` on `User`
pub fn define_by_credits(registry: &ModelRegistry) {
    model(registry, "User").define_scope("by_credits", |base, args| {
        let credits = args.first().cloned().unwrap_or_default();
        Ok(base.where_(Attributes::new().with("credits", credits)))
    });
}

/// Create one `User` per entry, with `credits` set
pub fn seed_users(registry: &ModelRegistry, credits: &[i64]) -> Vec<Record> {
    let users = model(registry, "User");
    credits
        .iter()
        .map(|c| users.create([("credits", *c)]).expect("create user"))
        .collect()
}
