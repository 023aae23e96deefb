//! Single-line text input.

use crate::field::Field;
use crate::inputs::Input;

/// A plain text input.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    field: Field,
}

impl Text {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            field: Field::new(label),
        }
    }

    /// Display the field's value as raw HTML.
    pub fn as_html(mut self) -> Self {
        self.field.meta.insert("asHtml", true);
        self
    }
}

impl Input for Text {
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

impl From<Text> for Field {
    fn from(input: Text) -> Self {
        input.field
    }
}
