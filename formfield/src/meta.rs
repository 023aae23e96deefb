//! The open metadata bag shared by field definitions and models.
//!
//! Keys are stored verbatim in camelCase, matching the transport format.
//! Direct reads use the exact key; the permissive lookup path normalizes
//! the requested key to camelCase first, so `lookup("null_values")` and
//! `lookup("nullValues")` hit the same entry. Missing keys read as `None`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered, open-ended key/value store attached to a field or model.
///
/// Merge is shallow and last-write-wins per key. Insertion order is
/// preserved and carried through serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meta(IndexMap<String, Value>);

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a value by its exact key.
    ///
    /// `Some(Value::Null)` reads as absent: a null entry carries no more
    /// information than a missing one.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Permissive read: normalize the key to camelCase, then look it up.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(&camel_case(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert a single entry, overwriting any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Shallow-merge entries into the bag, last write wins per key.
    pub fn merge<K, V, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in entries {
            self.0.insert(key.into(), value.into());
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Meta {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut meta = Meta::new();
        meta.merge(iter);
        meta
    }
}

/// Convert a key to camelCase: `null_values`, `null-values`, and
/// `null values` all become `nullValues`. Keys already in camelCase pass
/// through unchanged.
pub(crate) fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for (i, ch) in key.chars().enumerate() {
        if ch == '_' || ch == '-' || ch == ' ' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else if i == 0 {
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Render a scalar value the way it appears inside a rule token.
pub(crate) fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_is_last_write_wins() {
        let mut meta = Meta::new();
        meta.insert("rows", 5);
        meta.merge([("rows", 10)]);
        assert_eq!(meta.get("rows"), Some(&json!(10)));
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn lookup_normalizes_to_camel_case() {
        let mut meta = Meta::new();
        meta.insert("nullValues", json!([null, ""]));
        assert!(meta.lookup("null_values").is_some());
        assert!(meta.lookup("nullValues").is_some());
        assert!(meta.lookup("missing_key").is_none());
    }

    #[test]
    fn null_entries_read_as_absent() {
        let mut meta = Meta::new();
        meta.insert("hint", Value::Null);
        assert_eq!(meta.get("hint"), None);
    }

    #[test]
    fn camel_case_conversion() {
        assert_eq!(camel_case("null_values"), "nullValues");
        assert_eq!(camel_case("persistent-hint"), "persistentHint");
        assert_eq!(camel_case("as html"), "asHtml");
        assert_eq!(camel_case("asHtml"), "asHtml");
        assert_eq!(camel_case("Rows"), "rows");
    }

    #[test]
    fn preserves_insertion_order() {
        let mut meta = Meta::new();
        meta.insert("b", 1);
        meta.insert("a", 2);
        let keys: Vec<_> = meta.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["b", "a"]);
    }
}
