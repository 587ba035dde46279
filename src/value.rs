//! Attribute values.
//!
//! Attributes hold arbitrary JSON values. An attribute that does not exist is
//! represented as `None` rather than a sentinel, so "undefined" and `null` stay
//! distinguishable.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
pub use serde_json::Value;

/// Plain key/value snapshot of a model's attributes.
pub type Attributes = serde_json::Map<String, Value>;

static HTML_UNSAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[&<>"']"#).expect("static html escape pattern is valid"));

/// Returns true if `value` can hold named children.
#[must_use]
pub const fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_))
}

/// Returns an empty structured container.
#[must_use]
pub fn empty_container() -> Value {
    Value::Object(Attributes::new())
}

/// String coercion used when an attribute is rendered as text.
///
/// ```
/// use modelplus::value::display_text;
/// use serde_json::json;
///
/// assert_eq!(display_text(&json!("plain")), "plain");
/// assert_eq!(display_text(&json!(42)), "42");
/// assert_eq!(display_text(&json!([1, "a", true])), "1,a,true");
/// ```
#[must_use]
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        // Whole floats render without a fractional part, as `1` not `1.0`.
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Replaces `& < > " '` with their HTML entities.
#[must_use]
pub fn escape_html(text: &str) -> Cow<'_, str> {
    HTML_UNSAFE.replace_all(text, |caps: &Captures<'_>| match &caps[0] {
        "&" => "&amp;",
        "<" => "&lt;",
        ">" => "&gt;",
        "\"" => "&quot;",
        _ => "&#x27;",
    })
}
