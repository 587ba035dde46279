//! # modelplus - mutators for observable key-value models
//!
//! modelplus layers declarative attribute interception over a plain key/value
//! store. A mutator can compute an attribute on read, normalize or fan out a
//! write, or rename an attribute, while the model keeps its change-event
//! contract: one `change:<key>` event per changed key per write call and one
//! aggregate `change` event per outermost write, however many writes mutators
//! issue along the way.
//!
//! ## Core Concepts
//!
//! - **Model**: an attribute store composed with its type's schema
//! - **Mutator**: a get and/or set interceptor for one attribute key
//! - **Nested path**: a key such as `"name.first"` addressing inside a container attribute
//! - **Transient**: a computed attribute left out of save-style serialization
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use modelplus::{Model, ModelSchema, Mutator, SerializeOptions, SetOptions};
//! use serde_json::json;
//!
//! let schema = ModelSchema::builder()
//!     .default_value("firstName", json!("Iain"))
//!     .default_value("lastName", json!("Banks"))
//!     .mutator(
//!         "fullName",
//!         Mutator::getter(|m| {
//!             let first = m.resolve("firstName")?;
//!             let last = m.resolve("lastName")?;
//!             Some(json!(format!("{} {}", first.as_str()?, last.as_str()?)))
//!         })
//!         .transient(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let mut model = Model::new(Arc::new(schema)).unwrap();
//! model.apply("address.city", "Fife", &SetOptions::default()).unwrap();
//!
//! assert_eq!(model.resolve("fullName"), Some(json!("Iain Banks")));
//! assert_eq!(model.resolve("address"), Some(json!({"city": "Fife"})));
//! assert!(model.serialize(&SerializeOptions::default()).contains_key("fullName"));
//! assert!(!model.serialize(&SerializeOptions::for_save(false)).contains_key("fullName"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod mutator;
pub mod options;
pub mod path;
pub mod schema;
pub mod store;
pub mod value;

// Re-export primary types at crate root for convenience
pub use config::ModelConfig;
pub use error::{ModelError, ModelResult, ValidationError};
pub use events::{EventStream, ListenerId, ModelEvent};
pub use model::{BatchState, ClientId, Model};
pub use mutator::{Mutator, MutatorCall, MutatorKind, MutatorTable, SetterArgs};
pub use options::{MutatorOptions, SerializeOptions, SetOptions};
pub use schema::{ModelSchema, ModelSchemaBuilder};
pub use store::{AttributeStore, InMemoryStore, StoreError};
pub use value::{Attributes, Value};
