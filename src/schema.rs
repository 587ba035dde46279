//! Model type definitions.
//!
//! A [`ModelSchema`] is the static part of a model type: its mutators,
//! default attributes, validation hook and configuration. It is built once and
//! shared by every instance through an `Arc`, so none of it changes at runtime.

use std::fmt;
use std::sync::Arc;

use crate::config::ModelConfig;
use crate::error::ValidationError;
use crate::mutator::{Mutator, MutatorTable};
use crate::options::SetOptions;
use crate::value::{Attributes, Value};

/// Validation hook run before every write. `Err` carries the rejection reason.
pub type ValidatorFn = dyn Fn(&Attributes, &SetOptions) -> Result<(), String> + Send + Sync;

/// Static definition of a model type.
pub struct ModelSchema {
    mutators: MutatorTable,
    defaults: Attributes,
    validator: Option<Arc<ValidatorFn>>,
    config: ModelConfig,
}

impl ModelSchema {
    /// Start building a schema.
    #[must_use]
    pub fn builder() -> ModelSchemaBuilder {
        ModelSchemaBuilder::default()
    }

    /// Mutators in definition order.
    #[must_use]
    pub const fn mutators(&self) -> &MutatorTable {
        &self.mutators
    }

    /// Attributes seeded into new instances.
    #[must_use]
    pub const fn defaults(&self) -> &Attributes {
        &self.defaults
    }

    /// Type configuration.
    #[must_use]
    pub const fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Run the validation hook over a proposed write.
    pub fn validate(&self, attrs: &Attributes, options: &SetOptions) -> Result<(), ValidationError> {
        match &self.validator {
            Some(validator) => validator(attrs, options).map_err(|reason| ValidationError::Rejected { reason }),
            None => Ok(()),
        }
    }
}

impl Default for ModelSchema {
    fn default() -> Self {
        Self {
            mutators: MutatorTable::new(),
            defaults: Attributes::new(),
            validator: None,
            config: ModelConfig::default(),
        }
    }
}

impl fmt::Debug for ModelSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSchema")
            .field("mutators", &self.mutators)
            .field("defaults", &self.defaults)
            .field("validator", &self.validator.is_some())
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for [`ModelSchema`].
///
/// # Example
/// ```
/// use modelplus::{ModelSchema, Mutator};
/// use serde_json::json;
///
/// let schema = ModelSchema::builder()
///     .default_value("status", json!("awkward"))
///     .mutator("status", Mutator::setter(|model, args| {
///         let lowered = args.value.as_str().unwrap_or_default().to_lowercase();
///         model.raw_set(args.key, json!(lowered), args.options)
///     }))
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.mutators().len(), 1);
/// ```
#[derive(Default)]
pub struct ModelSchemaBuilder {
    mutators: Vec<(String, Mutator)>,
    defaults: Attributes,
    validator: Option<Arc<ValidatorFn>>,
    config: ModelConfig,
}

impl ModelSchemaBuilder {
    /// Define a mutator for `name`. Dotted names are matched literally.
    #[must_use]
    pub fn mutator(mut self, name: impl Into<String>, mutator: Mutator) -> Self {
        self.mutators.push((name.into(), mutator));
        self
    }

    /// Seed `key` with `value` in every new instance.
    #[must_use]
    pub fn default_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    /// Seed every entry of `defaults` in new instances.
    #[must_use]
    pub fn defaults(mut self, defaults: Attributes) -> Self {
        self.defaults.extend(defaults);
        self
    }

    /// Install the validation hook.
    #[must_use]
    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Attributes, &SetOptions) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Replace the configuration.
    #[must_use]
    pub fn config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the schema.
    ///
    /// Returns `ValidationError::EmptyMutatorName` if a mutator name is blank.
    pub fn build(self) -> Result<ModelSchema, ValidationError> {
        let mut mutators = MutatorTable::new();
        for (name, mutator) in self.mutators {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyMutatorName);
            }
            mutators.insert(name, mutator);
        }

        Ok(ModelSchema {
            mutators,
            defaults: self.defaults,
            validator: self.validator,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_build_collects_mutators_and_defaults() {
        let schema = ModelSchema::builder()
            .mutator("a", Mutator::getter(|_| None))
            .mutator("b.c", Mutator::setter(|_, _| Ok(())))
            .default_value("x", json!(1))
            .build()
            .unwrap();

        assert_eq!(schema.mutators().len(), 2);
        assert!(schema.mutators().contains("b.c"));
        assert_eq!(schema.defaults().get("x"), Some(&json!(1)));
    }

    #[test]
    fn test_build_rejects_blank_mutator_name() {
        let err = ModelSchema::builder()
            .mutator("  ", Mutator::getter(|_| None))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::EmptyMutatorName));
    }

    #[test]
    fn test_validate_without_hook_accepts() {
        let schema = ModelSchema::default();
        assert!(schema.validate(&Attributes::new(), &SetOptions::default()).is_ok());
    }

    #[test]
    fn test_validate_maps_rejection() {
        let schema = ModelSchema::builder()
            .validator(|attrs, _| {
                if attrs.contains_key("forbidden") {
                    Err("forbidden is read-only".to_string())
                } else {
                    Ok(())
                }
            })
            .build()
            .unwrap();

        let mut attrs = Attributes::new();
        attrs.insert("forbidden".to_string(), json!(true));
        let err = schema.validate(&attrs, &SetOptions::default()).unwrap_err();
        assert!(format!("{err}").contains("read-only"));
    }
}
