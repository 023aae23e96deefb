//! Number input.
//!
//! Number fields keep the `text` input kind and flag themselves through
//! meta `type = "number"`; the min/max/integer constraints land in the
//! metadata bag and surface as rule tokens through
//! [`Field::effective_rules`].

use serde_json::Value;

use crate::field::Field;
use crate::inputs::Input;

/// A number input.
#[derive(Debug, Clone, PartialEq)]
pub struct Number {
    field: Field,
}

impl Number {
    pub fn new(label: impl Into<String>) -> Self {
        let mut field = Field::new(label);
        field.meta.insert("type", "number");
        Self { field }
    }

    /// Constrain the field to integer values; adds `int` to the
    /// effective rules.
    pub fn integer(mut self, integer: bool) -> Self {
        self.field.meta.insert("integer", integer);
        self
    }

    /// The minimum value that can be assigned to the field.
    pub fn min(mut self, min: impl Into<Value>) -> Self {
        self.field.meta.insert("min", min);
        self
    }

    /// The maximum value that can be assigned to the field.
    pub fn max(mut self, max: impl Into<Value>) -> Self {
        self.field.meta.insert("max", max);
        self
    }

    /// The step size the field increments and decrements by.
    pub fn step(mut self, step: impl Into<Value>) -> Self {
        self.field.meta.insert("step", step);
        self
    }
}

impl Input for Number {
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

impl From<Number> for Field {
    fn from(input: Number) -> Self {
        input.field
    }
}
