//! Select input: option lists and conditional option groups.

use serde_json::Value;

use crate::field::{Field, InputKind};
use crate::inputs::Input;
use crate::meta::scalar_string;
use crate::options::{normalize_option, ConditionalOptions, OptionCondition, SelectOption};

/// A select menu.
///
/// Unconditional options live under meta `options` and are replaced
/// wholesale on each call. Conditional groups live under meta
/// `conditionalItems` and accumulate in call order; the two never
/// overwrite each other.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    field: Field,
}

impl Select {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            field: Field::with_kind(label, InputKind::Select),
        }
    }

    /// Allow multiple selections on the field.
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.field.meta.insert("multiple", multiple);
        self
    }

    /// Set the options for the select menu, replacing any previous
    /// unconditional list. Structured entries are kept as-is; bare values
    /// are wrapped as `{ text: capitalized(value), value }`.
    pub fn options<I, T>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let items = normalize_items(options);
        self.field.meta.insert("options", items);
        self
    }

    /// Obtain the options by invoking `source`, then set them.
    pub fn options_from<F, I, T>(self, source: F) -> Self
    where
        F: FnOnce() -> I,
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.options(source())
    }

    /// Append a conditional option group: the items only apply when the
    /// controlling field satisfies `condition`. Repeated calls append,
    /// never replace.
    pub fn options_when<I, T>(mut self, options: I, condition: OptionCondition) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let mut group = serde_json::Map::new();
        group.insert("items".to_string(), Value::Array(normalize_items(options)));
        group.insert("property".to_string(), Value::from(condition.property));
        group.insert("operation".to_string(), Value::from(condition.operation));
        group.insert("value".to_string(), condition.value);

        let mut groups = match self.field.meta.remove("conditionalItems") {
            Some(Value::Array(groups)) => groups,
            _ => Vec::new(),
        };
        groups.push(Value::Object(group));
        self.field.meta.insert("conditionalItems", groups);
        self
    }

    /// The unconditional options, empty when none were set.
    pub fn get_options(&self) -> Vec<SelectOption> {
        self.field
            .meta
            .get("options")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The conditional option groups, in the order they were added.
    pub fn conditional_options(&self) -> Vec<ConditionalOptions> {
        self.field
            .meta
            .get("conditionalItems")
            .and_then(Value::as_array)
            .map(|groups| {
                groups
                    .iter()
                    .filter_map(|group| serde_json::from_value(group.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Replace the rule set with an `in:` rule built from the
    /// unconditional options' values.
    ///
    /// Conditional groups are not folded into the rule; their allowed
    /// values depend on another field's state, which a flat rule token
    /// cannot express.
    pub fn rules_from_options(mut self) -> Self {
        if let Some(options) = self.field.meta.get("options").and_then(Value::as_array) {
            let values: Vec<String> = options
                .iter()
                .filter_map(|option| option.get("value"))
                .map(scalar_string)
                .collect();
            self.field.rules = vec![format!("in:{}", values.join(","))];
        }
        self
    }
}

fn normalize_items<I, T>(options: I) -> Vec<Value>
where
    I: IntoIterator<Item = T>,
    T: Into<Value>,
{
    options
        .into_iter()
        .map(|option| normalize_option(option.into()))
        .collect()
}

impl Input for Select {
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

impl From<Select> for Field {
    fn from(input: Select) -> Self {
        input.field
    }
}
