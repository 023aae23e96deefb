//! Select options and conditional option groups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::meta::scalar_string;

/// A single entry in a select menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Display text.
    #[serde(default)]
    pub text: String,
    /// The stored value.
    #[serde(default)]
    pub value: Value,
}

impl SelectOption {
    pub fn new(text: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}

impl From<SelectOption> for Value {
    fn from(option: SelectOption) -> Self {
        let mut map = Map::new();
        map.insert("text".to_string(), Value::from(option.text));
        map.insert("value".to_string(), option.value);
        Value::Object(map)
    }
}

impl From<&str> for SelectOption {
    fn from(value: &str) -> Self {
        Self::new(capitalize(value), value)
    }
}

impl From<String> for SelectOption {
    fn from(value: String) -> Self {
        Self::new(capitalize(&value), value)
    }
}

/// Normalize one raw option entry: structured entries are kept as-is
/// (including any extra keys), bare values are wrapped as
/// `{ text: capitalized(value), value }`.
pub(crate) fn normalize_option(value: Value) -> Value {
    match value {
        Value::Object(_) => value,
        other => {
            let mut map = Map::new();
            map.insert(
                "text".to_string(),
                Value::from(capitalize(&scalar_string(&other))),
            );
            map.insert("value".to_string(), other);
            Value::Object(map)
        }
    }
}

/// The comparison controlling a conditional option group: another field
/// (`property`) is compared to `value` with `operation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionCondition {
    pub property: String,
    pub operation: String,
    pub value: Value,
}

impl OptionCondition {
    /// The default `"="` comparison.
    pub fn eq(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(property, "=", value)
    }

    pub fn new(
        property: impl Into<String>,
        operation: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            property: property.into(),
            operation: operation.into(),
            value: value.into(),
        }
    }
}

/// A group of options that only applies when the controlling field
/// satisfies its comparison. Groups accumulate in call order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalOptions {
    pub items: Vec<SelectOption>,
    pub property: String,
    #[serde(default = "default_operation")]
    pub operation: String,
    #[serde(default)]
    pub value: Value,
}

fn default_operation() -> String {
    "=".to_string()
}

/// Upcase only the first character, leaving the rest untouched.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
