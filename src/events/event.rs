//! Event types emitted by models.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::options::SetOptions;
use crate::value::Value;

/// Listener name that matches every event.
pub const ALL_EVENTS: &str = "all";

/// Unique identifier for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListenerId(Uuid);

impl ListenerId {
    /// Create a new random listener id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Notification emitted by a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelEvent {
    /// `change:<key>`: a top-level key changed during one write call.
    Change {
        /// Key as the caller spelled it.
        key: String,
        /// Resolved value of the key after the write.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
        /// Options of the write.
        options: SetOptions,
    },
    /// `change`: aggregate notification, once per outermost write.
    ChangeAll {
        /// Options of the write that scheduled the event.
        options: SetOptions,
    },
    /// `mutators:set:<key>`: a mutator setter is about to handle a write.
    MutatorSet {
        /// Key handed to the setter.
        key: String,
    },
}

impl ModelEvent {
    /// Event name listeners register for.
    ///
    /// ```
    /// use modelplus::{ModelEvent, SetOptions};
    ///
    /// let event = ModelEvent::MutatorSet { key: "status".to_string() };
    /// assert_eq!(event.name(), "mutators:set:status");
    /// assert_eq!(ModelEvent::ChangeAll { options: SetOptions::default() }.name(), "change");
    /// ```
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Change { key, .. } => format!("change:{key}"),
            Self::ChangeAll { .. } => "change".to_string(),
            Self::MutatorSet { key } => format!("mutators:set:{key}"),
        }
    }

    /// The attribute key this event is about, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Change { key, .. } | Self::MutatorSet { key } => Some(key),
            Self::ChangeAll { .. } => None,
        }
    }
}

impl fmt::Display for ModelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
