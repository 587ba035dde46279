//! Write pipeline.
//!
//! Each write call validates the proposed attributes, opens a batch if it is
//! the outermost call, then routes every key to its mutator setter, to a
//! nested-path write, or straight to the store. Raw writes skip validation.
//! Change events follow once all keys are handled, and the outermost call
//! finally drains the aggregate `change` event.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::ModelResult;
use crate::events::ModelEvent;
use crate::mutator::{Mutator, SetterArgs};
use crate::options::SetOptions;
use crate::path::{self, AttrPath};
use crate::value::{empty_container, Attributes, Value};

use super::dispatch::{Access, Role};
use super::Model;

/// How keys are routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dispatch {
    /// Mutators, nested paths, then the store.
    Full,
    /// Literal keys straight to the store.
    Raw,
}

/// A key paired with its new value; `None` removes the key.
type Pair = (String, Option<Value>);

impl Model {
    /// Write `value` under `key`.
    ///
    /// With `options.unset` the key is removed instead and `value` is ignored.
    /// An empty key is a no-op. Fails without touching anything if the
    /// validation hook rejects the write.
    pub fn apply(&mut self, key: &str, value: impl Into<Value>, options: &SetOptions) -> ModelResult<()> {
        if key.is_empty() {
            return Ok(());
        }
        let value = if options.unset { None } else { Some(value.into()) };
        self.write(vec![(key.to_string(), value)], options, Dispatch::Full)
    }

    /// Write every entry of `attrs` in one batch.
    pub fn apply_map(&mut self, attrs: Attributes, options: &SetOptions) -> ModelResult<()> {
        let pairs = attrs
            .into_iter()
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| (key, if options.unset { None } else { Some(value) }))
            .collect();
        self.write(pairs, options, Dispatch::Full)
    }

    /// Raw setter: write the literal `key` to the store.
    ///
    /// This is the escape hatch mutator setters use to commit a value under
    /// their own key without being dispatched to themselves again. The
    /// validation hook is not consulted. The write still joins the current
    /// batch, so change tracking and events behave as for any other write.
    pub fn raw_set(&mut self, key: &str, value: impl Into<Value>, options: &SetOptions) -> ModelResult<()> {
        if key.is_empty() {
            return Ok(());
        }
        let value = if options.unset { None } else { Some(value.into()) };
        self.write(vec![(key.to_string(), value)], options, Dispatch::Raw)
    }

    /// Remove `key`. Nested keys remove only their leaf.
    pub fn unset(&mut self, key: &str, options: &SetOptions) -> ModelResult<()> {
        let options = SetOptions {
            unset: true,
            ..options.clone()
        };
        self.apply(key, Value::Null, &options)
    }

    /// Remove every stored attribute. Neither mutator setters nor the
    /// validation hook are consulted.
    pub fn clear(&mut self, options: &SetOptions) -> ModelResult<()> {
        let options = SetOptions {
            unset: true,
            ..options.clone()
        };
        let pairs = self.store.keys().into_iter().map(|key| (key, None)).collect();
        self.write(pairs, &options, Dispatch::Raw)
    }

    fn write(&mut self, pairs: Vec<Pair>, options: &SetOptions, dispatch: Dispatch) -> ModelResult<()> {
        if pairs.is_empty() {
            return Ok(());
        }

        // Raw writes are the unconditional store primitive and skip the hook.
        if dispatch == Dispatch::Full {
            let proposed: Attributes = pairs
                .iter()
                .map(|(key, value)| (key.clone(), value.clone().unwrap_or(Value::Null)))
                .collect();
            self.schema.validate(&proposed, options)?;
        }

        let outermost = self.txn.enter();
        if outermost {
            let snapshot = self.snapshot();
            self.txn.open(snapshot);
            debug!(cid = %self.cid, keys = pairs.len(), "batch opened");
        }

        let changes = match self.write_pairs(&pairs, options, dispatch) {
            Ok(changes) => changes,
            Err(err) => {
                if outermost {
                    self.txn.abort();
                }
                self.txn.exit();
                return Err(err);
            }
        };

        let id_attribute = self.schema.config().id_attribute.clone();
        if pairs.iter().any(|(key, _)| *key == id_attribute) {
            self.id = self.resolve(&id_attribute);
        }

        if !options.silent {
            if !changes.is_empty() {
                self.txn.schedule(options);
            }
            for key in changes {
                let value = self.resolve(&key);
                self.emit(ModelEvent::Change {
                    key,
                    value,
                    options: options.clone(),
                });
            }
        }

        if outermost {
            self.txn.start_drain();
            while let Some(pending) = self.txn.take_pending() {
                self.emit(ModelEvent::ChangeAll { options: pending });
            }
            self.txn.finish_drain();
            debug!(cid = %self.cid, "batch closed");
        }

        self.txn.exit();
        Ok(())
    }

    /// Handle every pair and return the keys whose value changed.
    fn write_pairs(&mut self, pairs: &[Pair], options: &SetOptions, dispatch: Dispatch) -> ModelResult<Vec<String>> {
        let mut changes = Vec::new();

        for (key, new) in pairs {
            let (current, previous) = match dispatch {
                Dispatch::Full => (self.resolve(key), self.previous(key)),
                Dispatch::Raw => (self.store.raw_get(key), self.txn.previous().get(key).cloned()),
            };
            let access = match dispatch {
                Dispatch::Full => self.classify(key, Role::Write),
                Dispatch::Raw => Access::Plain,
            };

            // A nested write can be skipped, so its outcome is read back.
            let outcome = match access {
                Access::Mutator(mutator) => {
                    self.txn.record(key, new.as_ref(), previous.as_ref());
                    self.write_mutated(key, &mutator, new.clone(), options)?;
                    new.clone()
                }
                Access::Nested(path) => {
                    self.write_nested(key, &path, new.clone(), options)?;
                    let outcome = self.resolve(key);
                    self.txn.record(key, outcome.as_ref(), previous.as_ref());
                    outcome
                }
                Access::Plain => {
                    self.txn.record(key, new.as_ref(), previous.as_ref());
                    self.write_plain(key, new.clone())?;
                    new.clone()
                }
            };
            if current != outcome {
                changes.push(key.clone());
            }
        }

        Ok(changes)
    }

    fn write_mutated(
        &mut self,
        key: &str,
        mutator: &Arc<Mutator>,
        new: Option<Value>,
        options: &SetOptions,
    ) -> ModelResult<()> {
        if !options.mutator_events_suppressed() {
            self.emit(ModelEvent::MutatorSet { key: key.to_string() });
        }
        trace!(key, kind = mutator.kind().name(), "dispatching write to mutator");
        mutator.write(
            self,
            SetterArgs {
                key,
                value: new.unwrap_or(Value::Null),
                options,
            },
        )
    }

    fn write_nested(&mut self, key: &str, path: &AttrPath, new: Option<Value>, options: &SetOptions) -> ModelResult<()> {
        let root = path.root();

        let Some(value) = new else {
            let Some(mut container) = self.store.raw_get(root) else {
                return Ok(());
            };
            if path::remove(&mut container, path.rest()).is_some() {
                self.store.raw_set(root, container)?;
                self.record_root(root);
            }
            return Ok(());
        };

        if self.resolve(root).is_none() {
            self.apply(root, empty_container(), &options.without_unset())?;
        }

        let mut container = self.store.raw_get(root).unwrap_or_else(empty_container);
        match path::assign(&mut container, path.rest(), value) {
            Ok(()) => {
                self.store.raw_set(root, container)?;
                self.record_root(root);
            }
            Err(err) => debug!(key, error = %err, "nested write skipped"),
        }
        Ok(())
    }

    /// Re-track a root attribute after a nested write changed it in place.
    fn record_root(&mut self, root: &str) {
        let current = self.resolve(root);
        let previous = self.previous(root);
        self.txn.record(root, current.as_ref(), previous.as_ref());
    }

    fn write_plain(&mut self, key: &str, new: Option<Value>) -> ModelResult<()> {
        match new {
            Some(value) => self.store.raw_set(key, value)?,
            None => {
                self.store.raw_remove(key)?;
            }
        }
        Ok(())
    }
}
