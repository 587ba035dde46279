//! Read pipeline.

use crate::path;
use crate::value::{display_text, escape_html, Value};

use super::dispatch::{Access, Role};
use super::Model;

impl Model {
    /// Read `key`.
    ///
    /// A getter mutator defined under the exact key wins. Otherwise a key with
    /// a separator past its first character is walked as a nested path, where
    /// any non-container along the way yields `None`. Everything else is a
    /// direct store lookup.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<Value> {
        match self.classify(key, Role::Read) {
            Access::Mutator(mutator) => mutator.read(self, key),
            Access::Nested(path) => {
                let root = self.resolve(path.root())?;
                path::lookup(&root, path.rest()).cloned()
            }
            Access::Plain => self.store.raw_get(key),
        }
    }

    /// Returns true if `key` resolves to something other than `null`.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        matches!(self.resolve(key), Some(value) if !value.is_null())
    }

    /// Resolve `key` as HTML-escaped text. Absent and `null` values render empty.
    #[must_use]
    pub fn escape(&self, key: &str) -> String {
        match self.resolve(key) {
            None | Some(Value::Null) => String::new(),
            Some(value) => escape_html(&display_text(&value)).into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::config::ModelConfig;
    use crate::model::Model;
    use crate::mutator::Mutator;
    use crate::schema::ModelSchema;

    fn model(schema: ModelSchema) -> Model {
        Model::new(Arc::new(schema)).unwrap()
    }

    #[test]
    fn test_plain_and_missing() {
        let m = model(ModelSchema::builder().default_value("a", json!(1)).build().unwrap());
        assert_eq!(m.resolve("a"), Some(json!(1)));
        assert_eq!(m.resolve("b"), None);
    }

    #[test]
    fn test_getter_shadows_stored_value() {
        let m = model(
            ModelSchema::builder()
                .default_value("b", json!("b"))
                .mutator("b", Mutator::getter(|_| Some(json!("c"))))
                .build()
                .unwrap(),
        );
        assert_eq!(m.resolve("b"), Some(json!("c")));
        assert_eq!(m.raw_get("b"), Some(json!("b")));
    }

    #[test]
    fn test_nested_through_getter_root() {
        let m = model(
            ModelSchema::builder()
                .mutator("profile", Mutator::getter(|_| Some(json!({"name": {"first": "Iain"}}))))
                .build()
                .unwrap(),
        );
        assert_eq!(m.resolve("profile.name.first"), Some(json!("Iain")));
        assert_eq!(m.resolve("profile.name.first.letter"), None);
    }

    #[test]
    fn test_nested_missing_parent() {
        let m = model(ModelSchema::default());
        assert_eq!(m.resolve("this.does.not.exist"), None);
    }

    #[test]
    fn test_custom_separator() {
        let config = ModelConfig {
            path_separator: '/',
            ..ModelConfig::default()
        };
        let m = model(
            ModelSchema::builder()
                .config(config)
                .default_value("name", json!({"first": "Iain"}))
                .default_value("a.b", json!("literal"))
                .build()
                .unwrap(),
        );
        assert_eq!(m.resolve("name/first"), Some(json!("Iain")));
        assert_eq!(m.resolve("a.b"), Some(json!("literal")));
    }

    #[test]
    fn test_has() {
        let m = model(
            ModelSchema::builder()
                .default_value("set", json!(0))
                .default_value("nothing", json!(null))
                .build()
                .unwrap(),
        );
        assert!(m.has("set"));
        assert!(!m.has("nothing"));
        assert!(!m.has("missing"));
    }

    #[test]
    fn test_escape() {
        let m = model(
            ModelSchema::builder()
                .default_value("html", json!("<b>Tom & Jerry</b>"))
                .default_value("count", json!(3))
                .default_value("nothing", json!(null))
                .mutator("quoted", Mutator::getter(|_| Some(json!("\"hi\" 'there'"))))
                .build()
                .unwrap(),
        );
        assert_eq!(m.escape("html"), "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;");
        assert_eq!(m.escape("count"), "3");
        assert_eq!(m.escape("nothing"), "");
        assert_eq!(m.escape("missing"), "");
        assert_eq!(m.escape("quoted"), "&quot;hi&quot; &#x27;there&#x27;");
    }
}
