//! Relation: an immutable, chainable view over records
//!
//! ## Evaluation Model
//!
//! A relation holds the record handles it was built from; it never owns
//! them and never mutates the collection. Every chained step (`where_`,
//! `where_not`, `order_by`, `limit`, ...) filters the already-materialized
//! sequence into a *new* relation. There is no deferred query plan.
//!
//! A relation therefore reflects the collection as it was when the relation
//! was built. Re-query through the model to observe later mutations.
//!
//! ## Scope Chaining
//!
//! A relation remembers which class it came from, so a named scope can be
//! applied to it with [`Relation::scope`].

use crate::registry::ModelRegistry;
use crate::record::Record;
use mockrecord_core::{AttributeAccess, Attributes, Error, Result, Value};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::trace;

/// Immutable view over an ordered sequence of records
#[derive(Clone, Debug)]
pub struct Relation {
    model: Option<Arc<str>>,
    records: Arc<[Record]>,
}

impl Relation {
    /// Wrap a sequence of records belonging to `model`
    pub fn new(model: impl Into<Arc<str>>, records: Vec<Record>) -> Self {
        Self {
            model: Some(model.into()),
            records: records.into(),
        }
    }

    /// Wrap records without a class (plain in-memory sequence)
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            model: None,
            records: records.into(),
        }
    }

    /// An empty relation for `model`
    pub fn empty(model: impl Into<Arc<str>>) -> Self {
        Self::new(model, Vec::new())
    }

    fn derive(&self, records: Vec<Record>) -> Self {
        Self {
            model: self.model.clone(),
            records: records.into(),
        }
    }

    /// Class this relation was built from, if any
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    // ========== Filtering ==========

    /// Records matching every condition (equality per attribute)
    ///
    /// Relative order from the source is preserved.
    pub fn where_(&self, conditions: impl Into<Attributes>) -> Relation {
        let conditions = conditions.into();
        let matched: Vec<Record> = self
            .records
            .iter()
            .filter(|r| r.matches(&conditions))
            .cloned()
            .collect();
        trace!(
            target: "mockrecord::relation",
            model = ?self.model,
            source = self.records.len(),
            matched = matched.len(),
            "where"
        );
        self.derive(matched)
    }

    /// Records matching none of the conditions
    pub fn where_not(&self, conditions: impl Into<Attributes>) -> Relation {
        let conditions = conditions.into();
        let kept = self
            .records
            .iter()
            .filter(|r| {
                !conditions
                    .iter()
                    .any(|(name, value)| r.matches(&Attributes::new().with(name.clone(), value.clone())))
            })
            .cloned()
            .collect();
        self.derive(kept)
    }

    /// Records for which `predicate` returns true
    pub fn filter<F>(&self, predicate: F) -> Relation
    where
        F: Fn(&Record) -> bool,
    {
        self.derive(self.records.iter().filter(|r| predicate(r)).cloned().collect())
    }

    /// First record matching the conditions, in relation order
    pub fn find_by(&self, conditions: impl Into<Attributes>) -> Option<Record> {
        let conditions = conditions.into();
        self.records.iter().find(|r| r.matches(&conditions)).cloned()
    }

    /// Record with the given id within this relation
    ///
    /// Ids match the way the class's record index keys them, so under the
    /// default stringified keys `find("1")` finds the record with id `1`.
    ///
    /// # Errors
    ///
    /// `Error::RecordNotFound` if no record in the relation has that id.
    pub fn find(&self, id: impl Into<Value>) -> Result<Record> {
        let id = id.into();
        self.records
            .iter()
            .find(|r| r.has_id(&id))
            .cloned()
            .ok_or_else(|| Error::record_not_found(self.model().unwrap_or("Record"), id.stringify()))
    }

    // ========== Ordering and Slicing ==========

    /// Stable ascending sort on an attribute
    ///
    /// Null sorts first; values of unrelated types keep their relative order.
    pub fn order_by(&self, attribute: &str) -> Relation {
        let mut records = self.to_vec();
        records.sort_by(|a, b| {
            a.read_attribute(attribute)
                .compare(&b.read_attribute(attribute))
                .unwrap_or(Ordering::Equal)
        });
        self.derive(records)
    }

    /// Stable descending sort on an attribute
    pub fn order_by_desc(&self, attribute: &str) -> Relation {
        let mut records = self.to_vec();
        records.sort_by(|a, b| {
            b.read_attribute(attribute)
                .compare(&a.read_attribute(attribute))
                .unwrap_or(Ordering::Equal)
        });
        self.derive(records)
    }

    /// Same records in reverse order
    pub fn reverse(&self) -> Relation {
        let mut records = self.to_vec();
        records.reverse();
        self.derive(records)
    }

    /// At most the first `n` records
    pub fn limit(&self, n: usize) -> Relation {
        self.derive(self.records.iter().take(n).cloned().collect())
    }

    /// First record
    pub fn first(&self) -> Option<Record> {
        self.records.first().cloned()
    }

    /// Last record
    pub fn last(&self) -> Option<Record> {
        self.records.last().cloned()
    }

    // ========== Projection ==========

    /// Values of one attribute, in relation order
    pub fn pluck(&self, attribute: &str) -> Vec<Value> {
        self.records
            .iter()
            .map(|r| r.read_attribute(attribute))
            .collect()
    }

    /// Primary key values, in relation order
    pub fn ids(&self) -> Vec<Value> {
        self.records.iter().map(Record::id).collect()
    }

    /// Sum of a numeric attribute
    ///
    /// Nulls and non-numeric values are skipped. The result is an `Int`
    /// unless a `Float` was summed or the integer total overflows `i64`,
    /// in which case it is the `Float` total.
    pub fn sum(&self, attribute: &str) -> Value {
        let mut int_total: Option<i64> = Some(0);
        let mut float_total: f64 = 0.0;
        let mut saw_float = false;
        for value in self.pluck(attribute) {
            match value {
                Value::Int(i) => {
                    int_total = int_total.and_then(|total| total.checked_add(i));
                    float_total += i as f64;
                }
                Value::Float(f) => {
                    float_total += f;
                    saw_float = true;
                }
                _ => {}
            }
        }
        match int_total {
            Some(total) if !saw_float => Value::Int(total),
            _ => Value::Float(float_total),
        }
    }

    // ========== Size and Access ==========

    /// Number of records
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the relation is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether `record` (by identity) is part of this relation
    pub fn contains(&self, record: &Record) -> bool {
        self.records.iter().any(|r| r.same_record(record))
    }

    /// Record at position `index`
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Borrow the records
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Clone the record handles
    pub fn to_vec(&self) -> Vec<Record> {
        self.records.to_vec()
    }

    /// Iterate in relation order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    // ========== Class-backed Operations ==========

    /// Apply a named scope of this relation's class to this relation
    ///
    /// # Errors
    ///
    /// `Error::UnknownScope` if the relation has no class or no class in its
    /// hierarchy declares the scope.
    pub fn scope(&self, registry: &ModelRegistry, name: &str, args: &[Value]) -> Result<Relation> {
        let model = self.model().ok_or_else(|| Error::UnknownScope {
            model: "Record".to_string(),
            scope: name.to_string(),
        })?;
        registry.dispatch_scope(model, name, Some(self.clone()), args)
    }

    /// Delete every record in this relation from its class
    ///
    /// Returns how many records were actually removed; records already gone
    /// are skipped.
    pub fn delete_all(&self, registry: &ModelRegistry) -> Result<usize> {
        let mut removed = 0;
        for record in self.records.iter() {
            if record.delete(registry)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl<'a> IntoIterator for &'a Relation {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl Default for Relation {
    fn default() -> Self {
        Relation::from_records(Vec::new())
    }
}

impl From<Vec<Record>> for Relation {
    fn from(records: Vec<Record>) -> Self {
        Relation::from_records(records)
    }
}
