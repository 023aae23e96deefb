//! The shared field structure and input-kind sum type.
//!
//! Every input kind shares one attribute structure: identity (label, name),
//! declared local attributes (input kind, placeholder, rules, flags,
//! default), and the open [`Meta`] bag for everything else. The typed
//! builders in [`crate::inputs`] fix the kind and layer kind-specific
//! fluent methods on top.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::meta::{scalar_string, Meta};

/// The closed set of input kinds a field can take.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputKind {
    #[default]
    Text,
    Textarea,
    Number,
    Select,
    Boolean,
    Radio,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Textarea => "textarea",
            InputKind::Number => "number",
            InputKind::Select => "select",
            InputKind::Boolean => "boolean",
            InputKind::Radio => "radio",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputKind {
    // Unknown tokens fall back to Text rather than erroring.
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_lowercase().as_str() {
            "textarea" => InputKind::Textarea,
            "number" => InputKind::Number,
            "select" => InputKind::Select,
            "boolean" => InputKind::Boolean,
            "radio" => InputKind::Radio,
            _ => InputKind::Text,
        };
        Ok(kind)
    }
}

/// A single form-input's complete declarative description.
///
/// Constructed once (label required, name derived when not given), then
/// mutated through the fluent surface of [`crate::inputs::Input`] until it
/// is handed to a validator or serializer. `name` is fixed at construction
/// and never recomputed, even if the label changes later.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// The displayable name of the field.
    pub label: String,
    /// The attribute name, unique within a field set.
    pub name: String,
    /// The field's input kind.
    pub input: InputKind,
    /// Placeholder text.
    pub placeholder: String,
    /// Validation rule tokens. `required`/`nullable` flags are appended at
    /// evaluation time by [`Field::effective_rules`], not stored here.
    pub rules: Vec<String>,
    /// Whether the field is read-only.
    pub readonly: bool,
    /// Whether the field is required.
    pub required: bool,
    /// Whether the field is nullable.
    pub nullable: bool,
    /// The default value if left empty.
    pub default: Option<Value>,
    /// Extra attribute names declared local to this field. Keys listed here
    /// are routed to local storage by `fill` instead of the meta bag.
    pub extra_locals: IndexMap<String, Value>,
    /// Open metadata for everything without a dedicated attribute.
    pub meta: Meta,
}

/// The built-in local attribute names, in declaration order.
const LOCAL_FIELDS: [&str; 9] = [
    "label",
    "name",
    "input",
    "placeholder",
    "rules",
    "readonly",
    "required",
    "nullable",
    "default",
];

impl Field {
    /// Create a field with the default (text) input kind.
    ///
    /// The name is derived from the label by lowercasing and replacing
    /// spaces with underscores; `"Field A"` becomes `"field_a"`.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_kind(label, InputKind::Text)
    }

    /// Create a field with an explicit input kind.
    pub fn with_kind(label: impl Into<String>, input: InputKind) -> Self {
        let label = label.into();
        let name = derive_name(&label);
        Self {
            label,
            name,
            input,
            placeholder: String::new(),
            rules: vec!["nullable".to_string()],
            readonly: false,
            required: false,
            nullable: false,
            default: None,
            extra_locals: IndexMap::new(),
            meta: Meta::new(),
        }
    }

    /// Create a field from a raw attribute map.
    ///
    /// The label is taken from the map when present; everything else goes
    /// through [`fill`](crate::inputs::Input::fill) semantics.
    pub fn from_attributes<K, V, I>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let attributes: IndexMap<String, Value> = attributes
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let label = attributes
            .get("label")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let mut field = Self::new(label);
        field.apply_fill(attributes);
        field
    }

    /// Overwrite declared local attributes present in `attributes` and
    /// replace the meta bag wholesale with the remaining keys.
    ///
    /// This is the one operation that replaces meta instead of merging into
    /// it; it also guarantees meta never contains a key that collides with
    /// a declared local attribute name.
    pub(crate) fn apply_fill(&mut self, mut attributes: IndexMap<String, Value>) {
        if let Some(v) = attributes.shift_remove("label") {
            if let Some(s) = v.as_str() {
                self.label = s.to_string();
            }
        }
        if let Some(v) = attributes.shift_remove("name") {
            if let Some(s) = v.as_str() {
                self.name = s.to_string();
            }
        }
        if let Some(v) = attributes.shift_remove("input") {
            if let Some(s) = v.as_str() {
                self.input = s.parse().unwrap_or_default();
            }
        }
        if let Some(v) = attributes.shift_remove("placeholder") {
            if let Some(s) = v.as_str() {
                self.placeholder = s.to_string();
            }
        }
        if let Some(v) = attributes.shift_remove("rules") {
            self.rules = rule_tokens(&v);
        }
        if let Some(v) = attributes.shift_remove("readonly") {
            if let Some(b) = v.as_bool() {
                self.readonly = b;
            }
        }
        if let Some(v) = attributes.shift_remove("required") {
            if let Some(b) = v.as_bool() {
                self.required = b;
            }
        }
        if let Some(v) = attributes.shift_remove("nullable") {
            if let Some(b) = v.as_bool() {
                self.nullable = b;
            }
        }
        if let Some(v) = attributes.shift_remove("default") {
            self.default = Some(v);
        }

        let extra_names: Vec<String> = self.extra_locals.keys().cloned().collect();
        for name in extra_names {
            if let Some(v) = attributes.shift_remove(&name) {
                self.extra_locals.insert(name, v);
            }
        }

        self.meta = attributes.into_iter().collect();
    }

    /// Permissive metadata read: the key is normalized to camelCase first;
    /// absent keys read as `None`, never an error.
    pub fn meta_value(&self, key: &str) -> Option<&Value> {
        self.meta.lookup(key)
    }

    /// A declared extra local attribute's current value.
    pub fn local_value(&self, name: &str) -> Option<&Value> {
        self.extra_locals.get(name)
    }

    /// The effective rule set: base rules, then `required` and `nullable`
    /// when the corresponding flags are set, in that order. Number fields
    /// additionally append `min:<v>`, `max:<v>`, and `int` for the
    /// corresponding meta values.
    pub fn effective_rules(&self) -> Vec<String> {
        let mut rules = self.rules.clone();
        if self.required {
            rules.push("required".to_string());
        }
        if self.nullable {
            rules.push("nullable".to_string());
        }
        if self.is_number() {
            if let Some(min) = self.meta.get("min") {
                rules.push(format!("min:{}", scalar_string(min)));
            }
            if let Some(max) = self.meta.get("max") {
                rules.push(format!("max:{}", scalar_string(max)));
            }
            if self
                .meta
                .get("integer")
                .and_then(Value::as_bool)
                .unwrap_or(false)
            {
                rules.push("int".to_string());
            }
        }
        rules
    }

    /// Whether this field is number-valued. The number builder keeps the
    /// `text` input kind and flags itself through meta `type = "number"`;
    /// an explicit `number` input kind counts as well.
    fn is_number(&self) -> bool {
        self.input == InputKind::Number
            || self.meta.get("type").and_then(Value::as_str) == Some("number")
    }

    /// Serialize to the flat transport map: the declared local attributes
    /// in declaration order, the extra locals, then every meta key.
    ///
    /// On a key collision the local attribute wins. `fill` keeps such
    /// collisions out of meta, but direct meta writes can reintroduce
    /// them, and the local value shadows the meta entry on output.
    pub fn to_map(&self) -> IndexMap<String, Value> {
        let mut map = IndexMap::new();
        map.insert("label".to_string(), Value::from(self.label.clone()));
        map.insert("name".to_string(), Value::from(self.name.clone()));
        map.insert("input".to_string(), Value::from(self.input.as_str()));
        map.insert(
            "placeholder".to_string(),
            Value::from(self.placeholder.clone()),
        );
        map.insert(
            "rules".to_string(),
            Value::from(self.rules.clone()),
        );
        map.insert("readonly".to_string(), Value::from(self.readonly));
        map.insert("required".to_string(), Value::from(self.required));
        map.insert("nullable".to_string(), Value::from(self.nullable));
        map.insert(
            "default".to_string(),
            self.default.clone().unwrap_or(Value::Null),
        );
        for (name, value) in &self.extra_locals {
            map.insert(name.clone(), value.clone());
        }
        for (key, value) in self.meta.iter() {
            if !map.contains_key(key) {
                map.insert(key.clone(), value.clone());
            }
        }
        map
    }

    /// The built-in local attribute names plus any declared extras.
    pub fn local_fields(&self) -> Vec<&str> {
        LOCAL_FIELDS
            .iter()
            .copied()
            .chain(self.extra_locals.keys().map(String::as_str))
            .collect()
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map = self.to_map();
        let mut state = serializer.serialize_map(Some(map.len()))?;
        for (key, value) in &map {
            state.serialize_entry(key, value)?;
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let attributes = IndexMap::<String, Value>::deserialize(deserializer)?;
        Ok(Field::from_attributes(attributes))
    }
}

fn derive_name(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

/// Normalize a rules value to an ordered token list. Accepts an array of
/// stringables or a single pipe-joined string.
fn rule_tokens(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(scalar_string).collect(),
        Value::String(s) => s.split('|').map(str::to_string).collect(),
        other => vec![scalar_string(other)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn name_derived_from_label() {
        let field = Field::new("Field A");
        assert_eq!(field.name, "field_a");
        assert_eq!(field.label, "Field A");
    }

    #[test]
    fn name_fixed_after_construction() {
        let mut field = Field::new("Field A");
        field.label = "Renamed".to_string();
        assert_eq!(field.name, "field_a");
    }

    #[test]
    fn default_rules_are_nullable() {
        let field = Field::new("Anything");
        assert_eq!(field.rules, ["nullable"]);
        assert_eq!(field.effective_rules(), ["nullable"]);
    }

    #[test]
    fn fill_replaces_meta_wholesale() {
        let mut field = Field::new("Field A");
        field.meta.insert("stale", "value");
        field.apply_fill(
            [
                ("placeholder".to_string(), json!("John Doe")),
                ("hint".to_string(), json!("a hint")),
            ]
            .into_iter()
            .collect(),
        );
        assert_eq!(field.placeholder, "John Doe");
        assert_eq!(field.meta.get("hint"), Some(&json!("a hint")));
        assert_eq!(field.meta.get("stale"), None);
        assert!(!field.meta.contains("placeholder"));
    }

    #[test]
    fn fill_routes_declared_extra_locals() {
        let mut field = Field::new("Field A");
        field.extra_locals.insert("extra".to_string(), json!(1));
        field.apply_fill([("extra".to_string(), json!(3))].into_iter().collect());
        assert_eq!(field.name, "field_a");
        assert_eq!(field.local_value("extra"), Some(&json!(3)));
        assert!(!field.meta.contains("extra"));
        assert_eq!(field.to_map()["extra"], json!(3));
        assert_eq!(field.to_map()["label"], json!("Field A"));
    }

    #[test]
    fn effective_rules_order_flags_then_number_tokens() {
        let mut field = Field::new("How old are you?");
        field.rules = vec!["max:24".to_string()];
        field.required = true;
        field.nullable = true;
        field.meta.insert("type", "number");
        field.meta.insert("min", 18);
        field.meta.insert("integer", true);
        assert_eq!(
            field.effective_rules(),
            ["max:24", "required", "nullable", "min:18", "int"]
        );
    }

    #[test]
    fn to_map_local_wins_over_meta() {
        let mut field = Field::new("Field A");
        field.meta.insert("label", "shadowed");
        field.meta.insert("hint", "kept");
        let map = field.to_map();
        assert_eq!(map["label"], json!("Field A"));
        assert_eq!(map["hint"], json!("kept"));
    }

    #[test]
    fn serialize_is_flat_map() {
        let mut field = Field::new("Field A");
        field.meta.insert("rows", 10);
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["label"], json!("Field A"));
        assert_eq!(value["input"], json!("text"));
        assert_eq!(value["rows"], json!(10));
        assert_eq!(value["default"], Value::Null);
    }

    #[test]
    fn deserialize_uses_fill_semantics() {
        let field: Field = serde_json::from_value(json!({
            "label": "Field A",
            "input": "select",
            "required": true,
            "multiple": true,
        }))
        .unwrap();
        assert_eq!(field.name, "field_a");
        assert_eq!(field.input, InputKind::Select);
        assert!(field.required);
        assert_eq!(field.meta.get("multiple"), Some(&json!(true)));
    }

    #[test]
    fn unknown_input_kind_parses_as_text() {
        assert_eq!("slider".parse::<InputKind>(), Ok(InputKind::Text));
        assert_eq!("radio".parse::<InputKind>(), Ok(InputKind::Radio));
    }
}
