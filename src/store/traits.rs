//! Abstract storage trait for model attributes.
//!
//! Backends only deal in top-level keys. Nested writes are performed by the
//! engine as read-modify-write of the root attribute, so a backend never has
//! to hand out interior references.

use thiserror::Error;

use crate::value::{Attributes, Value};

/// Errors that can occur while writing to a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend refused the key.
    #[error("Store is read-only for key '{key}'")]
    ReadOnly {
        /// Key of the refused write.
        key: String,
    },

    /// Backend error.
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Storage trait for a model's raw attributes.
///
/// Reads are infallible: a key that cannot be produced is absent.
pub trait AttributeStore: Send + Sync {
    /// Get the stored value for `key`, if any.
    fn raw_get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`, replacing any previous value.
    fn raw_set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove `key`, returning the previous value.
    fn raw_remove(&mut self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Returns true if `key` is stored.
    fn contains(&self, key: &str) -> bool {
        self.raw_get(key).is_some()
    }

    /// All stored keys.
    fn keys(&self) -> Vec<String>;

    /// Plain snapshot of every stored attribute.
    fn raw_serialize(&self) -> Attributes {
        self.keys()
            .into_iter()
            .filter_map(|key| self.raw_get(&key).map(|value| (key, value)))
            .collect()
    }
}
