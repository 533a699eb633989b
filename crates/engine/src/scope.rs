//! Named scopes and cross-class scope dispatch
//!
//! A scope is a named query fragment declared on one class. Invoking it on
//! a class that does not declare it walks the parent chain through the
//! registry (by class name) and forwards the call, with its arguments, to
//! the declaring class's scope-execution entry point.
//!
//! Without an explicit base, the owning class runs the scope over its own
//! full collection, so `Child.scope("by_credits")` and
//! `Parent.scope("by_credits")` produce identically filtered relations.
//! Chained on a relation, the scope runs over that relation instead.

use crate::registry::ModelRegistry;
use crate::relation::Relation;
use mockrecord_core::{Error, Result, Value};
use std::sync::Arc;
use tracing::trace;

/// Scope body: receives the base relation and the call arguments
pub type ScopeFn = Arc<dyn Fn(&Relation, &[Value]) -> Result<Relation> + Send + Sync>;

impl ModelRegistry {
    /// Name of the nearest class in `model`'s hierarchy declaring `scope`
    pub fn scope_owner(&self, model: &str, scope: &str) -> Result<String> {
        self.lineage(model)?
            .into_iter()
            .find(|m| m.has_scope(scope))
            .map(|m| m.name().to_string())
            .ok_or_else(|| Error::UnknownScope {
                model: model.to_string(),
                scope: scope.to_string(),
            })
    }

    /// Route a scope call to the class that declares it
    ///
    /// `base` is the relation the scope is chained on; `None` means the
    /// owning class's full collection.
    ///
    /// # Errors
    ///
    /// `Error::UnknownModel` if `model` (or an ancestor) is not loaded,
    /// `Error::UnknownScope` if no class in the hierarchy declares the scope,
    /// and whatever the scope body itself returns.
    pub fn dispatch_scope(
        &self,
        model: &str,
        scope: &str,
        base: Option<Relation>,
        args: &[Value],
    ) -> Result<Relation> {
        let owner_name = self.scope_owner(model, scope)?;
        let owner = self.resolve(&owner_name)?;
        trace!(
            target: "mockrecord::scope",
            invoked_on = %model,
            owner = %owner_name,
            scope = %scope,
            chained = base.is_some(),
            "dispatch"
        );
        let base = base.unwrap_or_else(|| owner.all());
        owner.call_scope(scope, &base, args)
    }
}
