//! Radio input.
//!
//! Same stored-value contract as [`crate::inputs::Boolean`], with the
//! `radio` input kind.

use serde_json::Value;

use crate::field::{Field, InputKind};
use crate::inputs::Input;

/// A radio input carrying paired true/false stored values.
#[derive(Debug, Clone, PartialEq)]
pub struct Radio {
    field: Field,
}

impl Radio {
    pub fn new(label: impl Into<String>) -> Self {
        let mut field = Field::with_kind(label, InputKind::Radio);
        field.rules = vec!["boolean".to_string()];
        Self { field }
    }

    /// Specify both stored values at once.
    pub fn values(self, true_value: impl Into<Value>, false_value: impl Into<Value>) -> Self {
        self.true_value(true_value).false_value(false_value)
    }

    /// The value to store when the field is "true".
    pub fn true_value(mut self, value: impl Into<Value>) -> Self {
        self.field.meta.insert("trueValue", value);
        self
    }

    /// The value to store when the field is "false".
    pub fn false_value(mut self, value: impl Into<Value>) -> Self {
        self.field.meta.insert("falseValue", value);
        self
    }

    /// The stored "true" value, defaulting to `true`.
    pub fn get_true_value(&self) -> Value {
        self.field
            .meta
            .get("trueValue")
            .cloned()
            .unwrap_or(Value::Bool(true))
    }

    /// The stored "false" value, defaulting to `false`.
    pub fn get_false_value(&self) -> Value {
        self.field
            .meta
            .get("falseValue")
            .cloned()
            .unwrap_or(Value::Bool(false))
    }
}

impl Input for Radio {
    fn as_field(&self) -> &Field {
        &self.field
    }

    fn as_field_mut(&mut self) -> &mut Field {
        &mut self.field
    }

    fn into_field(self) -> Field {
        self.field
    }
}

impl From<Radio> for Field {
    fn from(input: Radio) -> Self {
        input.field
    }
}
