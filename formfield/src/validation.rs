//! The validation boundary: an injected engine, a validator handle, and
//! batch entry points.
//!
//! The core stays free of any concrete validation binding: rule tokens
//! are handed to whatever [`ValidationEngine`] the caller supplies.
//! [`crate::engine::RuleEngine`] is the built-in implementation.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{FieldError, Result};
use crate::field::Field;

/// Field-level validation messages, keyed by field name, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Errors(IndexMap<String, Vec<String>>);

impl Errors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// Every message, across all fields, in field order.
    pub fn messages(&self) -> Vec<&str> {
        self.0
            .values()
            .flat_map(|msgs| msgs.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// The external validation engine boundary.
///
/// Takes a rule map keyed by field name and an input map; on success
/// returns the validated subset of the input (the keys that had declared
/// rules), on failure the field-to-messages map.
pub trait ValidationEngine {
    fn evaluate(
        &self,
        rules: &IndexMap<String, Vec<String>>,
        input: &IndexMap<String, Value>,
    ) -> std::result::Result<IndexMap<String, Value>, Errors>;
}

/// A bound validation run: an engine, the rule map derived from a field
/// set, and the input under test.
pub struct Validator<'e, E: ValidationEngine> {
    engine: &'e E,
    rules: IndexMap<String, Vec<String>>,
    input: IndexMap<String, Value>,
}

impl<'e, E: ValidationEngine> Validator<'e, E> {
    /// Build the rule map keyed by each field's name from its effective
    /// rule set and bind it to the engine and input.
    pub fn new<'f, I>(engine: &'e E, input: IndexMap<String, Value>, fields: I) -> Self
    where
        I: IntoIterator<Item = &'f Field>,
    {
        let rules = fields
            .into_iter()
            .map(|field| (field.name.clone(), field.effective_rules()))
            .collect();
        Self {
            engine,
            rules,
            input,
        }
    }

    /// The rule map this validator evaluates against.
    pub fn rules(&self) -> &IndexMap<String, Vec<String>> {
        &self.rules
    }

    pub fn passes(&self) -> bool {
        self.run().is_ok()
    }

    pub fn fails(&self) -> bool {
        !self.passes()
    }

    /// The failure map from the last evaluation, empty when passing.
    pub fn errors(&self) -> Errors {
        self.run().err().unwrap_or_default()
    }

    /// Raise on any rule failure, collecting all field errors.
    pub fn validate(&self) -> Result<()> {
        self.run().map(|_| ()).map_err(|errors| {
            debug!(fields = errors.len(), "validation failed");
            FieldError::Validation(errors)
        })
    }

    /// Raise on failure, otherwise return only the subset of input keys
    /// that matched a field with declared rules.
    pub fn validated(&self) -> Result<IndexMap<String, Value>> {
        self.run().map_err(|errors| {
            debug!(fields = errors.len(), "validation failed");
            FieldError::Validation(errors)
        })
    }

    /// The full input this validator was built over.
    pub fn into_input(self) -> IndexMap<String, Value> {
        self.input
    }

    fn run(&self) -> std::result::Result<IndexMap<String, Value>, Errors> {
        self.engine.evaluate(&self.rules, &self.input)
    }
}

/// Build a validator over `input` with the effective rules of `fields`.
pub fn validator<'e, 'f, E, I>(
    engine: &'e E,
    input: IndexMap<String, Value>,
    fields: I,
) -> Validator<'e, E>
where
    E: ValidationEngine,
    I: IntoIterator<Item = &'f Field>,
{
    Validator::new(engine, input, fields)
}

/// Batch validation entry point: raise on any rule failure, else return
/// the original input, or only the validated subset when `validated_only`
/// is set.
pub fn validate_input<'f, E, I>(
    engine: &E,
    input: IndexMap<String, Value>,
    fields: I,
    validated_only: bool,
) -> Result<IndexMap<String, Value>>
where
    E: ValidationEngine,
    I: IntoIterator<Item = &'f Field>,
{
    let validator = Validator::new(engine, input, fields);
    let validated = validator.validated()?;
    Ok(if validated_only {
        validated
    } else {
        validator.into_input()
    })
}

impl Field {
    /// Build a validator over `input` with the effective rules of `fields`.
    pub fn validator<'e, 'f, E, I>(
        engine: &'e E,
        input: IndexMap<String, Value>,
        fields: I,
    ) -> Validator<'e, E>
    where
        E: ValidationEngine,
        I: IntoIterator<Item = &'f Field>,
    {
        Validator::new(engine, input, fields)
    }

    /// See [`validate_input`].
    pub fn validate_input<'f, E, I>(
        engine: &E,
        input: IndexMap<String, Value>,
        fields: I,
        validated_only: bool,
    ) -> Result<IndexMap<String, Value>>
    where
        E: ValidationEngine,
        I: IntoIterator<Item = &'f Field>,
    {
        validate_input(engine, input, fields, validated_only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Engine stub that fails every field with one message.
    struct RejectAll;

    impl ValidationEngine for RejectAll {
        fn evaluate(
            &self,
            rules: &IndexMap<String, Vec<String>>,
            _input: &IndexMap<String, Value>,
        ) -> std::result::Result<IndexMap<String, Value>, Errors> {
            let mut errors = Errors::default();
            for field in rules.keys() {
                errors.add(field, "rejected");
            }
            Err(errors)
        }
    }

    /// Engine stub that accepts everything and echoes the ruled keys.
    struct AcceptAll;

    impl ValidationEngine for AcceptAll {
        fn evaluate(
            &self,
            rules: &IndexMap<String, Vec<String>>,
            input: &IndexMap<String, Value>,
        ) -> std::result::Result<IndexMap<String, Value>, Errors> {
            Ok(input
                .iter()
                .filter(|(k, _)| rules.contains_key(*k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect())
        }
    }

    fn sample_fields() -> Vec<Field> {
        vec![Field::new("Name"), Field::new("Age")]
    }

    #[test]
    fn validator_builds_rule_map_by_name() {
        let fields = sample_fields();
        let v = Validator::new(&AcceptAll, IndexMap::new(), &fields);
        assert_eq!(v.rules().len(), 2);
        assert_eq!(v.rules()["name"], vec!["nullable".to_string()]);
    }

    #[test]
    fn failing_engine_surfaces_all_field_errors() {
        let fields = sample_fields();
        let v = Validator::new(&RejectAll, IndexMap::new(), &fields);
        assert!(v.fails());
        let err = v.validate().unwrap_err();
        assert_eq!(err.errors().len(), 2);
        assert_eq!(err.errors().get("age"), ["rejected"]);
    }

    #[test]
    fn validate_input_returns_original_or_subset() {
        let fields = sample_fields();
        let input: IndexMap<String, Value> = [
            ("name".to_string(), json!("James")),
            ("unrelated".to_string(), json!(true)),
        ]
        .into_iter()
        .collect();

        let full = validate_input(&AcceptAll, input.clone(), &fields, false).unwrap();
        assert_eq!(full.len(), 2);

        let subset = validate_input(&AcceptAll, input, &fields, true).unwrap();
        assert_eq!(subset.len(), 1);
        assert!(subset.contains_key("name"));
    }

    #[test]
    fn errors_display_joins_field_messages() {
        let mut errors = Errors::default();
        errors.add("name", "the name field is required");
        errors.add("age", "the age field must be at least 18");
        let rendered = errors.to_string();
        assert!(rendered.contains("name: the name field is required"));
        assert!(rendered.contains("; age:"));
    }
}
