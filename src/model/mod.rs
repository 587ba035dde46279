//! The attribute access engine.
//!
//! A [`Model`] composes an [`AttributeStore`] with the static [`ModelSchema`]
//! of its type. Reads go through [`Model::resolve`], writes through
//! [`Model::apply`], and [`Model::serialize`] produces the plain mapping with
//! every computed attribute overlaid.

mod apply;
mod dispatch;
mod resolve;
mod serialize;
mod transaction;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;
use uuid::Uuid;

use crate::error::ModelResult;
use crate::events::{EventBus, EventStream, ListenerId, ModelEvent};
use crate::options::SetOptions;
use crate::path::{self, AttrPath};
use crate::schema::ModelSchema;
use crate::store::{AttributeStore, InMemoryStore};
use crate::value::{Attributes, Value};

use self::dispatch::{Access, Role};
use self::transaction::Transaction;

pub use self::transaction::BatchState;

/// Client-side identifier, unique per model instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(Uuid);

impl ClientId {
    /// Creates a new random client id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An observable model instance.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use modelplus::{Model, ModelSchema, Mutator, SetOptions};
/// use serde_json::json;
///
/// let schema = ModelSchema::builder()
///     .mutator("fullname", Mutator::setter(|model, args| {
///         let name = args.value.as_str().unwrap_or_default().to_string();
///         let mut parts = name.splitn(2, ' ');
///         model.apply("firstname", parts.next().unwrap_or_default(), args.options)?;
///         model.apply("lastname", parts.next().unwrap_or_default(), args.options)
///     }))
///     .build()
///     .unwrap();
///
/// let mut model = Model::new(Arc::new(schema)).unwrap();
/// model.apply("fullname", "Ada Lovelace", &SetOptions::default()).unwrap();
/// assert_eq!(model.resolve("firstname"), Some(json!("Ada")));
/// assert_eq!(model.resolve("lastname"), Some(json!("Lovelace")));
/// ```
pub struct Model {
    cid: ClientId,
    id: Option<Value>,
    schema: Arc<ModelSchema>,
    store: Box<dyn AttributeStore>,
    events: EventBus,
    txn: Transaction,
}

impl Model {
    /// Creates an instance seeded with the schema defaults.
    pub fn new(schema: Arc<ModelSchema>) -> ModelResult<Self> {
        Self::with_attributes(schema, Attributes::new())
    }

    /// Creates an instance seeded with the schema defaults overlaid by `attrs`.
    ///
    /// Seeding goes through [`Model::apply_map`], so mutator setters and the
    /// validation hook see the initial attributes.
    pub fn with_attributes(schema: Arc<ModelSchema>, attrs: Attributes) -> ModelResult<Self> {
        Self::with_store(schema, Box::new(InMemoryStore::new()), attrs)
    }

    /// Creates an instance over an existing store.
    ///
    /// Defaults are only seeded for keys the store does not already hold.
    pub fn with_store(
        schema: Arc<ModelSchema>,
        store: Box<dyn AttributeStore>,
        attrs: Attributes,
    ) -> ModelResult<Self> {
        let mut seed: Attributes = schema
            .defaults()
            .iter()
            .filter(|(key, _)| !store.contains(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        seed.extend(attrs);

        let mut model = Self {
            cid: ClientId::new(),
            id: None,
            schema,
            store,
            events: EventBus::new(),
            txn: Transaction::default(),
        };
        model.apply_map(seed, &SetOptions::default())?;
        model.txn.reset_changed();
        model.id = model.resolve(&model.schema.config().id_attribute);
        Ok(model)
    }

    /// Client id of this instance.
    #[must_use]
    pub const fn cid(&self) -> ClientId {
        self.cid
    }

    /// Current value of the identifier attribute.
    #[must_use]
    pub const fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    /// The type definition this instance was built from.
    #[must_use]
    pub const fn schema(&self) -> &Arc<ModelSchema> {
        &self.schema
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &dyn AttributeStore {
        self.store.as_ref()
    }

    /// Stored value of `key`, bypassing mutators and nested paths.
    #[must_use]
    pub fn raw_get(&self, key: &str) -> Option<Value> {
        self.store.raw_get(key)
    }

    /// Plain snapshot of the stored attributes, without computed values.
    #[must_use]
    pub fn attributes(&self) -> Attributes {
        self.store.raw_serialize()
    }

    /// Current phase of the write pipeline.
    #[must_use]
    pub fn batch_state(&self) -> BatchState {
        self.txn.state()
    }

    /// Returns true if any key changed in the last batch, or `key` did when given.
    #[must_use]
    pub fn has_changed(&self, key: Option<&str>) -> bool {
        match key {
            Some(key) => self.txn.changed().contains_key(key),
            None => !self.txn.changed().is_empty(),
        }
    }

    /// Keys changed in the last batch with their new values. Removed keys map to `null`.
    #[must_use]
    pub fn changed_attributes(&self) -> Attributes {
        self.txn
            .changed()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone().unwrap_or(Value::Null)))
            .collect()
    }

    /// Value of `key` when the last batch started. Nested paths are resolved
    /// inside the snapshot.
    #[must_use]
    pub fn previous(&self, key: &str) -> Option<Value> {
        let previous = self.txn.previous();
        if let Some(value) = previous.get(key) {
            return Some(value.clone());
        }
        let path = AttrPath::parse(key, self.schema.config().path_separator)?;
        previous
            .get(path.root())
            .and_then(|root| path::lookup(root, path.rest()))
            .cloned()
    }

    /// Every resolvable attribute as it was when the last batch started.
    #[must_use]
    pub fn previous_attributes(&self) -> &Attributes {
        self.txn.previous()
    }

    /// Register `listener` for events named `name` (`"change"`, `"change:<key>"`,
    /// `"mutators:set:<key>"`, or `"all"`).
    pub fn on<F>(&mut self, name: impl Into<String>, listener: F) -> ListenerId
    where
        F: Fn(&mut Model, &ModelEvent) + Send + Sync + 'static,
    {
        self.events.on(name, listener)
    }

    /// Remove one listener.
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    /// Remove every listener registered under `name`.
    pub fn off_event(&mut self, name: &str) -> usize {
        self.events.off_event(name)
    }

    /// Open an event stream with the configured capacity.
    pub fn subscribe(&mut self) -> EventStream {
        let capacity = self.schema.config().stream_capacity;
        self.events.subscribe(capacity)
    }

    /// Open an event stream buffering at most `capacity` events.
    pub fn subscribe_with_capacity(&mut self, capacity: usize) -> EventStream {
        self.events.subscribe(capacity)
    }

    pub(crate) fn emit(&mut self, event: ModelEvent) {
        trace!(cid = %self.cid, event = %event, "emit");
        let listeners = self.events.listeners_for(&event);
        self.events.publish(&event);
        for listener in listeners {
            listener(self, &event);
        }
    }

    fn classify(&self, key: &str, role: Role) -> Access {
        dispatch::classify(
            self.schema.mutators(),
            key,
            role,
            self.schema.config().path_separator,
        )
    }

    /// Every stored attribute under its literal key, overlaid with the
    /// value of every getter.
    fn snapshot(&self) -> Attributes {
        let mut out = self.store.raw_serialize();
        for (name, mutator) in self.schema.mutators().iter() {
            if !mutator.has_getter() {
                continue;
            }
            match self.resolve(name) {
                Some(value) => {
                    out.insert(name.to_string(), value);
                }
                None => {
                    out.remove(name);
                }
            }
        }
        out
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("cid", &self.cid)
            .field("id", &self.id)
            .field("attributes", &self.store.raw_serialize())
            .field("mutators", &self.schema.mutators().len())
            .field("state", &self.txn.state())
            .finish()
    }
}
