//! Key selectors: how an id (or parent id) is read from a payload.

use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;

use serde_json::{Number, Value};

/// Bounds every node id has to satisfy.
pub trait NodeKey: Clone + Eq + Hash + fmt::Display + fmt::Debug {}

impl<K> NodeKey for K where K: Clone + Eq + Hash + fmt::Display + fmt::Debug {}

/// Extracts a key from an item. `None` means the item does not carry the key.
pub trait KeySelector<T> {
    type Key: NodeKey;

    fn select(&self, item: &T) -> Option<Self::Key>;

    /// Name used in error messages.
    fn describe(&self) -> Cow<'_, str> {
        Cow::Borrowed("key")
    }
}

impl<T, K, F> KeySelector<T> for F
where
    K: NodeKey,
    F: Fn(&T) -> Option<K>,
{
    type Key = K;

    fn select(&self, item: &T) -> Option<K> {
        self(item)
    }
}

/// Named field of a JSON object record.
///
/// Strings are used verbatim, numbers and booleans by their textual form.
/// Integral floats drop the fraction, so `1.0` selects the same key as `1`.
/// `null`, arrays, objects and absent fields select nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field(String);

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl KeySelector<Value> for Field {
    type Key = String;

    fn select(&self, item: &Value) -> Option<String> {
        match item.get(&self.0)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(number_key(n)),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn describe(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.0)
    }
}

/// Integral floats read like integers, so `1.0` and `1` name the same node.
fn number_key(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_EXACT_FLOAT => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({"id": "a-1"}), Some("a-1"))]
    #[case(json!({"id": 42}), Some("42"))]
    #[case(json!({"id": 1.0}), Some("1"))]
    #[case(json!({"id": -3.0}), Some("-3"))]
    #[case(json!({"id": 1.5}), Some("1.5"))]
    #[case(json!({"id": true}), Some("true"))]
    #[case(json!({"id": null}), None)]
    #[case(json!({"id": [1]}), None)]
    #[case(json!({"name": "x"}), None)]
    fn given_json_record_when_selecting_field_then_returns_textual_key(
        #[case] record: Value,
        #[case] expected: Option<&str>,
    ) {
        let field = Field::new("id");
        assert_eq!(field.select(&record).as_deref(), expected);
    }

    #[test]
    fn given_closure_when_used_as_selector_then_delegates() {
        let selector = |n: &(u32, String)| Some(n.0);
        assert_eq!(selector.select(&(7, "seven".to_string())), Some(7));
        assert_eq!(KeySelector::<(u32, String)>::describe(&selector), "key");
    }
}
