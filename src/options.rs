//! Options accepted by writes and serialization.

use serde::{Deserialize, Deserializer, Serialize};

use crate::value::Value;

/// Mutator-specific write options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutatorOptions {
    /// Suppress `mutators:set:<key>` events only.
    pub silent: bool,
}

/// Options for [`Model::apply`](crate::Model::apply) and friends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetOptions {
    /// Suppress every event for this call.
    pub silent: bool,
    /// Remove the addressed attributes instead of assigning them.
    pub unset: bool,
    /// Options read by mutator dispatch.
    pub mutators: MutatorOptions,
}

impl SetOptions {
    /// Options that suppress all events.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            silent: true,
            ..Self::default()
        }
    }

    /// Options that remove the addressed attributes.
    #[must_use]
    pub fn unset() -> Self {
        Self {
            unset: true,
            ..Self::default()
        }
    }

    /// Options that suppress `mutators:set:<key>` events but keep change events.
    #[must_use]
    pub fn mutators_silent() -> Self {
        Self {
            mutators: MutatorOptions { silent: true },
            ..Self::default()
        }
    }

    /// Same options with removal switched off.
    #[must_use]
    pub fn without_unset(&self) -> Self {
        Self {
            unset: false,
            ..self.clone()
        }
    }

    /// Returns true if `mutators:set:<key>` events are suppressed.
    #[must_use]
    pub const fn mutator_events_suppressed(&self) -> bool {
        self.silent || self.mutators.silent
    }
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Options for [`Model::serialize`](crate::Model::serialize).
///
/// The presence of `emulateHTTP`, whatever its value, marks a save-style
/// serialization in which transient mutators are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializeOptions {
    /// Save marker.
    #[serde(
        rename = "emulateHTTP",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub emulate_http: Option<Value>,
}

impl SerializeOptions {
    /// Options for a save-style serialization.
    #[must_use]
    pub fn for_save(emulate_http: bool) -> Self {
        Self {
            emulate_http: Some(Value::Bool(emulate_http)),
        }
    }

    /// Returns true if the save marker is present.
    #[must_use]
    pub const fn is_save(&self) -> bool {
        self.emulate_http.is_some()
    }
}
