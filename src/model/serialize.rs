//! Serialization with computed attributes.

use crate::mutator::MutatorKind;
use crate::options::SerializeOptions;
use crate::value::{Attributes, Value};

use super::Model;

impl Model {
    /// Plain mapping of the model: stored attributes overlaid with the value
    /// of every getter, in mutator definition order.
    ///
    /// For a save-style serialization (see [`SerializeOptions::is_save`]),
    /// transient mutators are removed from the result instead, even when an
    /// attribute of the same name is stored. Setter-only mutators contribute
    /// nothing.
    #[must_use]
    pub fn serialize(&self, options: &SerializeOptions) -> Attributes {
        let mut out = self.store.raw_serialize();
        let saving = options.is_save();

        for (name, mutator) in self.schema.mutators().iter() {
            if matches!(mutator.kind(), MutatorKind::Setter(_)) {
                continue;
            }
            if saving && mutator.is_transient() {
                out.remove(name);
                continue;
            }
            match mutator.read(self, name) {
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

    /// [`Model::serialize`] as a JSON object.
    #[must_use]
    pub fn to_value(&self, options: &SerializeOptions) -> Value {
        Value::Object(self.serialize(options))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::model::Model;
    use crate::mutator::Mutator;
    use crate::options::{SerializeOptions, SetOptions};
    use crate::schema::ModelSchema;

    #[test]
    fn test_unmutated_model() {
        let m = Model::new(Arc::new(
            ModelSchema::builder()
                .default_value("a", json!("a"))
                .default_value("b", json!("b"))
                .build()
                .unwrap(),
        ))
        .unwrap();
        assert_eq!(m.to_value(&SerializeOptions::default()), json!({"a": "a", "b": "b"}));
    }

    #[test]
    fn test_getter_overrides_literal() {
        let m = Model::new(Arc::new(
            ModelSchema::builder()
                .default_value("state", json!("stored"))
                .mutator("state", Mutator::getter(|_| Some(json!("computed"))))
                .build()
                .unwrap(),
        ))
        .unwrap();
        assert_eq!(m.serialize(&SerializeOptions::default()).get("state"), Some(&json!("computed")));
    }

    #[test]
    fn test_setter_only_contributes_nothing() {
        let mut m = Model::new(Arc::new(
            ModelSchema::builder()
                .default_value("status", json!("awkward"))
                .mutator(
                    "status",
                    Mutator::setter(|model, args| {
                        let lowered = args.value.as_str().unwrap_or_default().to_lowercase();
                        model.raw_set(args.key, lowered, args.options)
                    }),
                )
                .build()
                .unwrap(),
        ))
        .unwrap();
        assert_eq!(m.to_value(&SerializeOptions::default())["status"], json!("awkward"));

        m.apply("status", "SUPERCOOL", &SetOptions::mutators_silent()).unwrap();
        assert_eq!(m.to_value(&SerializeOptions::default())["status"], json!("supercool"));
    }

    #[test]
    fn test_transient_removed_only_when_saving() {
        let m = Model::new(Arc::new(
            ModelSchema::builder()
                .default_value("label", json!("stored label"))
                .mutator("label", Mutator::getter(|_| Some(json!("computed label"))).transient())
                .build()
                .unwrap(),
        ))
        .unwrap();

        let general = m.serialize(&SerializeOptions::default());
        assert_eq!(general.get("label"), Some(&json!("computed label")));

        let saved = m.serialize(&SerializeOptions::for_save(false));
        assert!(!saved.contains_key("label"));
    }

    #[test]
    fn test_combined_ignores_transient() {
        let m = Model::new(Arc::new(
            ModelSchema::builder()
                .mutator("state", Mutator::combined(|_| Ok(Some(json!("on")))).transient())
                .build()
                .unwrap(),
        ))
        .unwrap();
        let saved = m.serialize(&SerializeOptions::for_save(true));
        assert_eq!(saved.get("state"), Some(&json!("on")));
    }

    #[test]
    fn test_absent_computed_value_is_omitted() {
        let m = Model::new(Arc::new(
            ModelSchema::builder()
                .default_value("maybe", json!("stored"))
                .mutator("maybe", Mutator::getter(|_| None))
                .build()
                .unwrap(),
        ))
        .unwrap();
        assert!(!m.serialize(&SerializeOptions::default()).contains_key("maybe"));
    }
}
