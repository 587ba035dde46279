//! Attribute storage for models.
//!
//! The [`AttributeStore`] trait is the plain key/value layer that the access
//! engine sits on. It knows nothing about mutators, nested paths or events.

mod memory;
mod traits;

pub use memory::InMemoryStore;
pub use traits::{AttributeStore, StoreError};
