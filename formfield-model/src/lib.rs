//! Field-meta accessors for persisted models
//!
//! `formfield-model` applies the same getter/setter-over-metadata pattern
//! as the field builders to a persisted entity's `meta` attribute,
//! independent of the field hierarchy. A model exposes its [`Meta`] bag
//! through [`HasFieldMeta`] and gains paired accessors for the common
//! field-meta keys: each setter merges one key (last write wins) and
//! returns the set value, each getter reads permissively with a
//! documented default.
//!
//! ```
//! use formfield::Meta;
//! use formfield_model::HasFieldMeta;
//!
//! struct Setting {
//!     meta: Meta,
//! }
//!
//! impl HasFieldMeta for Setting {
//!     fn field_meta(&self) -> &Meta {
//!         &self.meta
//!     }
//!     fn field_meta_mut(&mut self) -> &mut Meta {
//!         &mut self.meta
//!     }
//! }
//!
//! let mut setting = Setting { meta: Meta::new() };
//! assert_eq!(setting.rows(), 5);
//! setting.set_rows(10);
//! assert_eq!(setting.rows(), 10);
//! ```

use indexmap::IndexMap;
use serde_json::Value;

use formfield::Meta;

/// Getter/setter accessors over a model's `meta` attribute.
///
/// Implementors only supply access to the bag; every accessor is
/// provided. Reads are permissive: a missing key yields the documented
/// default, never an error.
pub trait HasFieldMeta {
    fn field_meta(&self) -> &Meta;
    fn field_meta_mut(&mut self) -> &mut Meta;

    /// Shallow-merge entries into the meta bag, last write wins per key.
    fn with_meta<K, V, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.field_meta_mut().merge(entries);
    }

    /// Options list, for select and radio inputs.
    fn options(&self) -> Vec<Value> {
        self.field_meta()
            .get("options")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    fn set_options(&mut self, options: Vec<Value>) -> Vec<Value> {
        self.field_meta_mut().insert("options", options.clone());
        options
    }

    /// Minimum value, for number inputs, sliders and range sliders.
    fn min(&self) -> f64 {
        self.field_meta()
            .get("min")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    fn set_min(&mut self, min: f64) -> f64 {
        self.field_meta_mut().insert("min", min);
        min
    }

    /// Maximum value, for number inputs, sliders and range sliders.
    fn max(&self) -> f64 {
        self.field_meta()
            .get("max")
            .and_then(Value::as_f64)
            .unwrap_or(100.0)
    }

    fn set_max(&mut self, max: f64) -> f64 {
        self.field_meta_mut().insert("max", max);
        max
    }

    /// Stored "true" value, for select, switch and radio inputs.
    fn true_value(&self) -> Value {
        self.field_meta()
            .get("trueValue")
            .cloned()
            .unwrap_or(Value::Bool(true))
    }

    fn set_true_value(&mut self, true_value: Value) -> Value {
        self.field_meta_mut().insert("trueValue", true_value.clone());
        true_value
    }

    /// Stored "false" value, for select, switch and radio inputs.
    fn false_value(&self) -> Value {
        self.field_meta()
            .get("falseValue")
            .cloned()
            .unwrap_or(Value::Bool(false))
    }

    fn set_false_value(&mut self, false_value: Value) -> Value {
        self.field_meta_mut()
            .insert("falseValue", false_value.clone());
        false_value
    }

    /// Step size, defaulting to 1.
    fn step(&self) -> f64 {
        self.field_meta()
            .get("step")
            .and_then(Value::as_f64)
            .unwrap_or(1.0)
    }

    fn set_step(&mut self, step: f64) -> f64 {
        self.field_meta_mut().insert("step", step);
        step
    }

    /// Visibility conditions for the field.
    fn conditions(&self) -> Vec<Value> {
        self.field_meta()
            .get("conditions")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    fn set_conditions(&mut self, conditions: Vec<Value>) -> Vec<Value> {
        self.field_meta_mut().insert("conditions", conditions.clone());
        conditions
    }

    /// Options gated on conditions.
    fn condition_options(&self) -> Vec<Value> {
        self.field_meta()
            .get("conditionOptions")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    fn set_condition_options(&mut self, condition_options: Vec<Value>) -> Vec<Value> {
        self.field_meta_mut()
            .insert("conditionOptions", condition_options.clone());
        condition_options
    }

    fn multiple(&self) -> bool {
        self.field_meta()
            .get("multiple")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    fn set_multiple(&mut self, multiple: bool) -> bool {
        self.field_meta_mut().insert("multiple", multiple);
        multiple
    }

    fn integer(&self) -> bool {
        self.field_meta()
            .get("integer")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    fn set_integer(&mut self, integer: bool) -> bool {
        self.field_meta_mut().insert("integer", integer);
        integer
    }

    /// Textarea rows, defaulting to 5.
    fn rows(&self) -> u32 {
        self.field_meta()
            .get("rows")
            .and_then(Value::as_u64)
            .map(|rows| rows as u32)
            .unwrap_or(5)
    }

    fn set_rows(&mut self, rows: u32) -> u32 {
        self.field_meta_mut().insert("rows", rows);
        rows
    }

    fn hint(&self) -> Option<String> {
        self.field_meta()
            .get("hint")
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn set_hint(&mut self, hint: Option<String>) -> Option<String> {
        self.field_meta_mut()
            .insert("hint", hint.clone().map(Value::from).unwrap_or(Value::Null));
        hint
    }

    fn persistent_hint(&self) -> bool {
        self.field_meta()
            .get("persistentHint")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    fn set_persistent_hint(&mut self, persistent_hint: bool) -> bool {
        self.field_meta_mut()
            .insert("persistentHint", persistent_hint);
        persistent_hint
    }

    fn as_html(&self) -> bool {
        self.field_meta()
            .get("asHtml")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    fn set_as_html(&mut self, as_html: bool) -> bool {
        self.field_meta_mut().insert("asHtml", as_html);
        as_html
    }

    fn creation_rules(&self) -> Vec<String> {
        string_list(self.field_meta().get("creationRules"))
    }

    fn set_creation_rules(&mut self, creation_rules: Vec<String>) -> Vec<String> {
        self.field_meta_mut()
            .insert("creationRules", creation_rules.clone());
        creation_rules
    }

    fn update_rules(&self) -> Vec<String> {
        string_list(self.field_meta().get("updateRules"))
    }

    fn set_update_rules(&mut self, update_rules: Vec<String>) -> Vec<String> {
        self.field_meta_mut()
            .insert("updateRules", update_rules.clone());
        update_rules
    }

    /// Whether the field is number-valued.
    fn number(&self) -> bool {
        self.field_meta()
            .get("number")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    fn set_number(&mut self, number: bool) -> bool {
        self.field_meta_mut().insert("number", number);
        number
    }

    /// Values treated as null, defaulting to `[null, ""]`.
    fn null_values(&self) -> Vec<Value> {
        self.field_meta()
            .get("nullValues")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_else(|| vec![Value::Null, Value::from("")])
    }

    fn set_null_values(&mut self, null_values: Vec<Value>) -> Vec<Value> {
        self.field_meta_mut()
            .insert("nullValues", null_values.clone());
        null_values
    }

    /// Merge the entity's own serialized fields with the meta map, meta
    /// keys last.
    ///
    /// A meta key named like a declared field overrides it on output,
    /// the opposite of the field layer, where local attributes win. The
    /// asymmetry is intentional and kept as-is.
    fn to_map_with_meta(&self, base: IndexMap<String, Value>) -> IndexMap<String, Value> {
        let mut map = base;
        for (key, value) in self.field_meta().iter() {
            map.insert(key.clone(), value.clone());
        }
        map
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Setting {
        key: String,
        meta: Meta,
    }

    impl Setting {
        fn new(key: &str) -> Self {
            Self {
                key: key.to_string(),
                meta: Meta::new(),
            }
        }

        fn to_map(&self) -> IndexMap<String, Value> {
            let mut base = IndexMap::new();
            base.insert("key".to_string(), Value::from(self.key.clone()));
            self.to_map_with_meta(base)
        }
    }

    impl HasFieldMeta for Setting {
        fn field_meta(&self) -> &Meta {
            &self.meta
        }

        fn field_meta_mut(&mut self) -> &mut Meta {
            &mut self.meta
        }
    }

    #[test]
    fn accessors_read_documented_defaults() {
        let setting = Setting::new("weight");
        assert_eq!(setting.min(), 0.0);
        assert_eq!(setting.max(), 100.0);
        assert_eq!(setting.step(), 1.0);
        assert_eq!(setting.rows(), 5);
        assert_eq!(setting.true_value(), json!(true));
        assert_eq!(setting.false_value(), json!(false));
        assert_eq!(setting.hint(), None);
        assert!(!setting.multiple());
        assert!(setting.options().is_empty());
        assert_eq!(setting.null_values(), vec![Value::Null, json!("")]);
    }

    #[test]
    fn setters_merge_and_return_the_set_value() {
        let mut setting = Setting::new("weight");
        assert_eq!(setting.set_min(5.0), 5.0);
        assert_eq!(setting.set_max(200.0), 200.0);
        assert_eq!(setting.set_rows(10), 10);
        assert_eq!(setting.min(), 5.0);
        assert_eq!(setting.max(), 200.0);
        assert_eq!(setting.meta.len(), 3);
    }

    #[test]
    fn with_meta_is_last_write_wins() {
        let mut setting = Setting::new("weight");
        setting.set_multiple(false);
        setting.with_meta([("multiple", true)]);
        assert!(setting.multiple());
    }

    #[test]
    fn set_hint_accepts_none() {
        let mut setting = Setting::new("weight");
        setting.set_hint(Some("In kilograms".to_string()));
        assert_eq!(setting.hint(), Some("In kilograms".to_string()));
        setting.set_hint(None);
        assert_eq!(setting.hint(), None);
    }

    #[test]
    fn serialization_merges_meta_last() {
        let mut setting = Setting::new("weight");
        setting.set_min(5.0);
        setting.with_meta([("key", "shadowed")]);

        let map = setting.to_map();
        assert_eq!(map["min"], json!(5.0));
        // Meta wins over the declared field on output.
        assert_eq!(map["key"], json!("shadowed"));
    }

    #[test]
    fn rule_list_accessors() {
        let mut setting = Setting::new("email");
        setting.set_creation_rules(vec!["required".to_string(), "email".to_string()]);
        assert_eq!(setting.creation_rules(), ["required", "email"]);
        assert!(setting.update_rules().is_empty());
    }
}
