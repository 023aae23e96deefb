//! Multi-line text input.

use serde_json::Value;

use crate::field::{Field, InputKind};
use crate::inputs::Input;

/// A textarea input.
#[derive(Debug, Clone, PartialEq)]
pub struct Textarea {
    field: Field,
}

impl Textarea {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            field: Field::with_kind(label, InputKind::Textarea),
        }
    }

    /// Set the number of rows used for the textarea.
    pub fn rows(mut self, rows: u32) -> Self {
        self.field.meta.insert("rows", rows);
        self
    }

    /// The number of rows, defaulting to 5.
    pub fn get_rows(&self) -> u32 {
        self.field
            .meta
            .get("rows")
            .and_then(Value::as_u64)
            .map(|rows| rows as u32)
            .unwrap_or(5)
    }
}

impl Input for Textarea {
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

impl From<Textarea> for Field {
    fn from(input: Textarea) -> Self {
        input.field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_default_and_override() {
        let plain = Textarea::new("More about yourself?");
        assert_eq!(plain.get_rows(), 5);
        assert_eq!(plain.as_field().input, InputKind::Textarea);

        let tall = Textarea::new("More about yourself?").rows(10);
        assert_eq!(tall.get_rows(), 10);
    }
}
