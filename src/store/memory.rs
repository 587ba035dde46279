//! In-memory storage backend.
//!
//! This is the default backend for models and the reference implementation of
//! [`AttributeStore`]. Keys iterate in sorted order, so snapshots are stable.

use std::collections::BTreeMap;

use crate::store::traits::{AttributeStore, StoreError};
use crate::value::{Attributes, Value};

/// Attribute store backed by a `BTreeMap`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    attributes: BTreeMap<String, Value>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `attributes`.
    #[must_use]
    pub fn from_attributes(attributes: Attributes) -> Self {
        Self {
            attributes: attributes.into_iter().collect(),
        }
    }

    /// Number of stored attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl AttributeStore for InMemoryStore {
    fn raw_get(&self, key: &str) -> Option<Value> {
        self.attributes.get(key).cloned()
    }

    fn raw_set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.attributes.insert(key.to_string(), value);
        Ok(())
    }

    fn raw_remove(&mut self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.attributes.remove(key))
    }

    fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    fn keys(&self) -> Vec<String> {
        self.attributes.keys().cloned().collect()
    }

    fn raw_serialize(&self) -> Attributes {
        self.attributes
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}
