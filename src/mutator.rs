//! Mutator definitions.
//!
//! A mutator intercepts reads and/or writes of one attribute key. The shape of
//! a mutator is fixed when it is defined:
//!
//! - [`Mutator::getter`]: computed attribute, writes fall through.
//! - [`Mutator::setter`]: write interceptor, reads fall through.
//! - [`Mutator::get_set`]: both roles as separate callables.
//! - [`Mutator::combined`]: one callable serving both roles, told apart by
//!   the [`MutatorCall`] variant it receives.
//!
//! Getter and get/set mutators may be marked [`transient`](Mutator::transient),
//! which keeps their computed value out of save-style serialization.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::error::ModelResult;
use crate::model::Model;
use crate::options::SetOptions;
use crate::value::Value;

/// Computes an attribute from the model.
pub type GetterFn = dyn Fn(&Model) -> Option<Value> + Send + Sync;

/// Handles a write of an attribute. The write is fully delegated to the
/// body, which commits values with [`Model::apply`] or [`Model::raw_set`].
pub type SetterFn = dyn Fn(&mut Model, SetterArgs<'_>) -> ModelResult<()> + Send + Sync;

/// Serves both roles. The returned value is only used for reads.
pub type CombinedFn = dyn Fn(MutatorCall<'_>) -> ModelResult<Option<Value>> + Send + Sync;

/// Arguments handed to a mutator setter.
#[derive(Debug)]
pub struct SetterArgs<'a> {
    /// The key being written, exactly as the caller spelled it.
    pub key: &'a str,
    /// The proposed value. `Null` when the write is an unset.
    pub value: Value,
    /// Options of the write.
    pub options: &'a SetOptions,
}

/// Invocation of a combined mutator.
pub enum MutatorCall<'a> {
    /// Read the computed value.
    Get(&'a Model),
    /// Handle a write.
    Set(&'a mut Model, SetterArgs<'a>),
}

/// Shape of a mutator, decided at definition time.
pub enum MutatorKind {
    #[allow(missing_docs)]
    Getter(Box<GetterFn>),
    #[allow(missing_docs)]
    Setter(Box<SetterFn>),
    #[allow(missing_docs)]
    GetSet { get: Box<GetterFn>, set: Box<SetterFn> },
    #[allow(missing_docs)]
    Combined(Box<CombinedFn>),
}

impl MutatorKind {
    /// Human-readable kind name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Getter(_) => "getter",
            Self::Setter(_) => "setter",
            Self::GetSet { .. } => "get_set",
            Self::Combined(_) => "combined",
        }
    }
}

/// A get/set interceptor for one attribute key.
pub struct Mutator {
    kind: MutatorKind,
    transient: bool,
}

impl Mutator {
    /// Computed attribute.
    ///
    /// ```
    /// use modelplus::{Model, ModelSchema, Mutator};
    /// use serde_json::json;
    /// use std::sync::Arc;
    ///
    /// let schema = ModelSchema::builder()
    ///     .mutator("fullname", Mutator::getter(|m| {
    ///         let first = m.resolve("firstname")?;
    ///         let last = m.resolve("lastname")?;
    ///         Some(json!(format!("{} {}", first.as_str()?, last.as_str()?)))
    ///     }))
    ///     .default_value("firstname", json!("Chris"))
    ///     .default_value("lastname", json!("Luebcke"))
    ///     .build()
    ///     .unwrap();
    ///
    /// let model = Model::new(Arc::new(schema)).unwrap();
    /// assert_eq!(model.resolve("fullname"), Some(json!("Chris Luebcke")));
    /// ```
    pub fn getter<F>(get: F) -> Self
    where
        F: Fn(&Model) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            kind: MutatorKind::Getter(Box::new(get)),
            transient: false,
        }
    }

    /// Write interceptor.
    pub fn setter<F>(set: F) -> Self
    where
        F: Fn(&mut Model, SetterArgs<'_>) -> ModelResult<()> + Send + Sync + 'static,
    {
        Self {
            kind: MutatorKind::Setter(Box::new(set)),
            transient: false,
        }
    }

    /// Computed attribute with a write interceptor.
    pub fn get_set<G, S>(get: G, set: S) -> Self
    where
        G: Fn(&Model) -> Option<Value> + Send + Sync + 'static,
        S: Fn(&mut Model, SetterArgs<'_>) -> ModelResult<()> + Send + Sync + 'static,
    {
        Self {
            kind: MutatorKind::GetSet {
                get: Box::new(get),
                set: Box::new(set),
            },
            transient: false,
        }
    }

    /// Single callable serving both roles.
    pub fn combined<F>(call: F) -> Self
    where
        F: Fn(MutatorCall<'_>) -> ModelResult<Option<Value>> + Send + Sync + 'static,
    {
        Self {
            kind: MutatorKind::Combined(Box::new(call)),
            transient: false,
        }
    }

    /// Mark the computed value as transient.
    ///
    /// Only getter and get/set mutators honour the flag.
    #[must_use]
    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    /// The mutator's shape.
    #[must_use]
    pub const fn kind(&self) -> &MutatorKind {
        &self.kind
    }

    /// Returns true if reads of the key are intercepted.
    #[must_use]
    pub const fn has_getter(&self) -> bool {
        !matches!(self.kind, MutatorKind::Setter(_))
    }

    /// Returns true if writes of the key are intercepted.
    #[must_use]
    pub const fn has_setter(&self) -> bool {
        !matches!(self.kind, MutatorKind::Getter(_))
    }

    /// Returns true if the computed value is left out of save-style serialization.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        self.transient && matches!(self.kind, MutatorKind::Getter(_) | MutatorKind::GetSet { .. })
    }

    pub(crate) fn read(&self, model: &Model, key: &str) -> Option<Value> {
        match &self.kind {
            MutatorKind::Getter(get) | MutatorKind::GetSet { get, .. } => get(model),
            MutatorKind::Combined(call) => match call(MutatorCall::Get(model)) {
                Ok(value) => value,
                Err(err) => {
                    warn!(key, error = %err, "combined mutator failed to read");
                    None
                }
            },
            MutatorKind::Setter(_) => None,
        }
    }

    pub(crate) fn write(&self, model: &mut Model, args: SetterArgs<'_>) -> ModelResult<()> {
        match &self.kind {
            MutatorKind::Setter(set) | MutatorKind::GetSet { set, .. } => set(model, args),
            MutatorKind::Combined(call) => call(MutatorCall::Set(model, args)).map(|_| ()),
            MutatorKind::Getter(_) => Ok(()),
        }
    }
}

impl fmt::Debug for Mutator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutator")
            .field("kind", &self.kind.name())
            .field("transient", &self.transient)
            .finish()
    }
}

/// Mutators of a model type, in definition order.
#[derive(Debug, Clone, Default)]
pub struct MutatorTable {
    entries: Vec<(String, Arc<Mutator>)>,
    index: HashMap<String, usize>,
}

impl MutatorTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `name`. Redefining a name replaces it in place.
    pub fn insert(&mut self, name: impl Into<String>, mutator: Mutator) {
        let name = name.into();
        let mutator = Arc::new(mutator);
        if let Some(&pos) = self.index.get(&name) {
            self.entries[pos].1 = mutator;
        } else {
            self.index.insert(name.clone(), self.entries.len());
            self.entries.push((name, mutator));
        }
    }

    /// Look up the mutator defined under exactly `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Mutator>> {
        self.index.get(name).map(|&pos| &self.entries[pos].1)
    }

    /// Returns true if `name` is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Mutator>)> {
        self.entries.iter().map(|(name, m)| (name.as_str(), m))
    }

    /// Number of defined mutators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no mutator is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
