//! Typed variant builders over the shared [`Field`] structure.
//!
//! Each builder fixes the input kind at construction and adds its
//! kind-specific fluent methods; the shared surface (identity, display
//! metadata, rules, flags, fill, validation, serialization) is provided
//! by the [`Input`] trait. Builder methods take `self` by value and
//! return it, so definitions read as one chain:
//!
//! ```
//! use formfield::{Input, Select};
//!
//! let gender = Select::new("Gender")
//!     .options(["Fridge", "Bridge"])
//!     .with_default("other");
//! assert_eq!(gender.as_field().name, "gender");
//! ```

mod boolean;
mod number;
mod radio;
mod select;
mod text;
mod textarea;

pub use boolean::Boolean;
pub use number::Number;
pub use radio::Radio;
pub use select::Select;
pub use text::Text;
pub use textarea::Textarea;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{FieldError, Result};
use crate::field::{Field, InputKind};
use crate::validation::{ValidationEngine, Validator};

/// The shared fluent surface of every input builder.
///
/// Implementors only supply access to the underlying [`Field`]; every
/// other method is provided.
pub trait Input: Sized {
    fn as_field(&self) -> &Field;
    fn as_field_mut(&mut self) -> &mut Field;
    fn into_field(self) -> Field;

    /// Set the attribute name, overriding the one derived from the label.
    fn name(mut self, name: impl Into<String>) -> Self {
        self.as_field_mut().name = name.into();
        self
    }

    /// Set the displayable label. The attribute name is not recomputed.
    fn label(mut self, label: impl Into<String>) -> Self {
        self.as_field_mut().label = label.into();
        self
    }

    /// Override the input kind.
    fn input(mut self, input: InputKind) -> Self {
        self.as_field_mut().input = input;
        self
    }

    fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.as_field_mut().placeholder = placeholder.into();
        self
    }

    /// Set the default value used when the field is left empty.
    fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.as_field_mut().default = Some(default.into());
        self
    }

    fn get_default(&self) -> Option<&Value> {
        self.as_field().default.as_ref()
    }

    /// Set the tip (help) text for the field.
    fn hint(mut self, hint: impl Into<String>) -> Self {
        self.as_field_mut().meta.insert("hint", hint.into());
        self
    }

    /// Alias for [`hint`](Input::hint).
    fn help(self, help_text: impl Into<String>) -> Self {
        self.hint(help_text)
    }

    /// Keep the hint visible instead of showing it only on focus.
    fn persistent_hint(mut self, persistent_hint: bool) -> Self {
        self.as_field_mut()
            .meta
            .insert("persistentHint", persistent_hint);
        self
    }

    /// Shallow-merge entries into the metadata bag, last write wins.
    fn with_meta<K, V, I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.as_field_mut().meta.merge(entries);
        self
    }

    /// Permissive metadata read (camelCase-normalized key).
    fn meta_value(&self, key: &str) -> Option<&Value> {
        self.as_field().meta_value(key)
    }

    /// Replace the validation rules for the field.
    fn rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.as_field_mut().rules = rules.into_iter().map(|r| r.to_string()).collect();
        self
    }

    /// Record creation-time rules under meta `creationRules`. Informational:
    /// they are not merged into the active rule set.
    fn creation_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let tokens: Vec<Value> = rules
            .into_iter()
            .map(|r| Value::from(r.to_string()))
            .collect();
        self.as_field_mut().meta.insert("creationRules", tokens);
        self
    }

    /// Record update-time rules under meta `updateRules`. Informational.
    fn update_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let tokens: Vec<Value> = rules
            .into_iter()
            .map(|r| Value::from(r.to_string()))
            .collect();
        self.as_field_mut().meta.insert("updateRules", tokens);
        self
    }

    /// Mark the field read-only.
    fn readonly(mut self, readonly: bool) -> Self {
        self.as_field_mut().readonly = readonly;
        self
    }

    /// Mark the field required; appends `required` at evaluation time.
    fn required(mut self, required: bool) -> Self {
        self.as_field_mut().required = required;
        self
    }

    /// Mark the field nullable; appends `nullable` at evaluation time.
    fn nullable(mut self, nullable: bool) -> Self {
        self.as_field_mut().nullable = nullable;
        self
    }

    /// Mark the field nullable and register the values treated as null.
    fn nullable_with<V, I>(self, nullable: bool, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.nullable(nullable).null_values(values)
    }

    /// Register the values treated as null under meta `nullValues`.
    fn null_values<V, I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.as_field_mut().meta.insert("nullValues", values);
        self
    }

    /// Overwrite declared local attributes from `attributes` and replace
    /// the metadata bag wholesale with the remaining keys.
    fn fill<K, V, I>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let attributes: IndexMap<String, Value> = attributes
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.as_field_mut().apply_fill(attributes);
        self
    }

    /// Declare an extra local attribute with its initial value. Keys
    /// declared local are routed past the metadata bag by `fill`.
    fn with_local(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.as_field_mut()
            .extra_locals
            .insert(name.into(), value.into());
        self
    }

    /// The effective rule set (base rules plus flag and variant tokens).
    fn effective_rules(&self) -> Vec<String> {
        self.as_field().effective_rules()
    }

    /// Validate a single value against this field's effective rules.
    ///
    /// Returns `Ok(true)` on pass (regardless of `assert`), `Ok(false)`
    /// on failure without assert, and a [`FieldError::Validation`]
    /// carrying the field-level messages on failure with assert.
    fn validate<E: ValidationEngine>(
        &self,
        engine: &E,
        value: impl Into<Value>,
        assert: bool,
    ) -> Result<bool> {
        let field = self.as_field();
        let input: IndexMap<String, Value> =
            [(field.name.clone(), value.into())].into_iter().collect();
        let validator = Validator::new(engine, input, std::iter::once(field));
        let errors = validator.errors();
        if errors.is_empty() {
            Ok(true)
        } else if assert {
            Err(FieldError::Validation(errors))
        } else {
            Ok(false)
        }
    }

    /// Serialize to the flat transport map.
    fn to_map(&self) -> IndexMap<String, Value> {
        self.as_field().to_map()
    }
}

impl Input for Field {
    fn as_field(&self) -> &Field {
        self
    }

    fn as_field_mut(&mut self) -> &mut Field {
        self
    }

    fn into_field(self) -> Field {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fluent_chain_on_plain_field() {
        let field = Field::new("Whats your name?")
            .name("name")
            .rules(["max:24"])
            .required(true)
            .placeholder("John Doe");
        assert_eq!(field.name, "name");
        assert_eq!(field.placeholder, "John Doe");
        assert_eq!(field.effective_rules(), ["max:24", "required"]);
    }

    #[test]
    fn hint_and_persistent_hint_write_meta() {
        let field = Field::new("More about yourself?")
            .hint("In a few words.")
            .persistent_hint(true);
        assert_eq!(field.meta.get("hint"), Some(&json!("In a few words.")));
        assert_eq!(field.meta.get("persistentHint"), Some(&json!(true)));
    }

    #[test]
    fn creation_rules_are_informational() {
        let field = Field::new("Email").creation_rules(["required", "email"]);
        assert_eq!(
            field.meta.get("creationRules"),
            Some(&json!(["required", "email"]))
        );
        assert_eq!(field.effective_rules(), ["nullable"]);
    }

    #[test]
    fn nullable_with_records_null_values() {
        let field = Field::new("Size").nullable_with(true, ["", "none"]);
        assert!(field.nullable);
        assert_eq!(field.meta.get("nullValues"), Some(&json!(["", "none"])));
        assert_eq!(field.effective_rules(), ["nullable", "nullable"]);
    }

    #[test]
    fn label_change_keeps_name() {
        let field = Field::new("Field A").label("Renamed");
        assert_eq!(field.name, "field_a");
        assert_eq!(field.label, "Renamed");
    }
}
