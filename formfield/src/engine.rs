//! Rule tokens and the built-in validation engine.
//!
//! [`RuleEngine`] is the default [`ValidationEngine`] implementation: it
//! interprets the rule-token vocabulary fields produce (`required`,
//! `nullable`, `boolean`, `int`, `numeric`, `string`, `min:<n>`,
//! `max:<n>`, `in:<a,b,...>`, `pattern:<regex>`). Unknown tokens are
//! skipped with a warning rather than failing the field; a typo in a
//! rule should surface in logs, not reject user input.

use std::str::FromStr;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

use crate::meta::scalar_string;
use crate::validation::{Errors, ValidationEngine};

/// A parsed rule token.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    Nullable,
    Boolean,
    Int,
    Numeric,
    StringType,
    Min(f64),
    Max(f64),
    In(Vec<String>),
    Pattern(String),
    /// Anything the engine does not understand, kept verbatim.
    Other(String),
}

impl FromStr for Rule {
    // Unknown or malformed tokens parse to Other; the engine decides what
    // to do with them.
    type Err = ();

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match token.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (token, None),
        };
        let rule = match (name, arg) {
            ("required", None) => Rule::Required,
            ("nullable", None) => Rule::Nullable,
            ("boolean" | "bool", None) => Rule::Boolean,
            ("int" | "integer", None) => Rule::Int,
            ("numeric", None) => Rule::Numeric,
            ("string", None) => Rule::StringType,
            ("min", Some(arg)) => match arg.parse() {
                Ok(min) => Rule::Min(min),
                Err(_) => Rule::Other(token.to_string()),
            },
            ("max", Some(arg)) => match arg.parse() {
                Ok(max) => Rule::Max(max),
                Err(_) => Rule::Other(token.to_string()),
            },
            ("in", Some(arg)) => Rule::In(arg.split(',').map(str::to_string).collect()),
            ("pattern" | "regex", Some(arg)) => Rule::Pattern(arg.to_string()),
            _ => Rule::Other(token.to_string()),
        };
        Ok(rule)
    }
}

/// The built-in rule-token engine.
///
/// Evaluation model: every ruled field is checked and errors are
/// collected across all of them, so one failing field does not hide
/// another. A field that is absent from the input only fails `required`;
/// a null value passes when `nullable` is present and skips the
/// remaining checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    fn check_field(name: &str, rules: &[Rule], value: &Value, errors: &mut Errors) {
        let nullable = rules.contains(&Rule::Nullable);
        if value.is_null() {
            if !nullable && rules.contains(&Rule::Required) {
                errors.add(name, format!("the {name} field is required"));
            }
            return;
        }
        for rule in rules {
            match rule {
                Rule::Required => {
                    if is_blank(value) {
                        errors.add(name, format!("the {name} field is required"));
                    }
                }
                Rule::Nullable => {}
                Rule::Boolean => {
                    if !is_boolean_like(value) {
                        errors.add(name, format!("the {name} field must be true or false"));
                    }
                }
                Rule::Int => {
                    if !is_integer_like(value) {
                        errors.add(name, format!("the {name} field must be an integer"));
                    }
                }
                Rule::Numeric => {
                    if numeric_value(value).is_none() {
                        errors.add(name, format!("the {name} field must be a number"));
                    }
                }
                Rule::StringType => {
                    if !value.is_string() {
                        errors.add(name, format!("the {name} field must be a string"));
                    }
                }
                Rule::Min(min) => {
                    if let Some(message) = check_min(name, value, *min) {
                        errors.add(name, message);
                    }
                }
                Rule::Max(max) => {
                    if let Some(message) = check_max(name, value, *max) {
                        errors.add(name, message);
                    }
                }
                Rule::In(allowed) => {
                    if !allowed.contains(&scalar_string(value)) {
                        errors.add(name, format!("the selected {name} is invalid"));
                    }
                }
                Rule::Pattern(pattern) => match regex::Regex::new(pattern) {
                    Ok(re) => {
                        let text = scalar_string(value);
                        if !re.is_match(&text) {
                            errors.add(name, format!("the {name} field format is invalid"));
                        }
                    }
                    Err(e) => {
                        warn!(field = %name, %pattern, error = %e, "skipping invalid pattern rule");
                    }
                },
                Rule::Other(token) => {
                    warn!(field = %name, rule = %token, "skipping unknown rule token");
                }
            }
        }
    }
}

impl ValidationEngine for RuleEngine {
    fn evaluate(
        &self,
        rules: &IndexMap<String, Vec<String>>,
        input: &IndexMap<String, Value>,
    ) -> Result<IndexMap<String, Value>, Errors> {
        let mut errors = Errors::default();
        let mut validated = IndexMap::new();

        for (name, tokens) in rules {
            let parsed: Vec<Rule> = tokens
                .iter()
                .map(|t| t.parse().unwrap_or_else(|_| Rule::Other(t.clone())))
                .collect();

            match input.get(name) {
                None => {
                    if parsed.contains(&Rule::Required) {
                        errors.add(name, format!("the {name} field is required"));
                    }
                }
                Some(value) => {
                    let before = errors.get(name).len();
                    Self::check_field(name, &parsed, value, &mut errors);
                    if errors.get(name).len() == before {
                        validated.insert(name.clone(), value.clone());
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(validated)
        } else {
            Err(errors)
        }
    }
}

/// Null, the empty string, and the empty array count as blank.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Accepted boolean shapes: true/false, 0/1, "0"/"1".
fn is_boolean_like(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(n) => n.as_f64() == Some(0.0) || n.as_f64() == Some(1.0),
        Value::String(s) => s == "0" || s == "1",
        _ => false,
    }
}

fn is_integer_like(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        Value::String(s) => {
            let s = s.strip_prefix('-').unwrap_or(s);
            !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Size semantics per type: numeric magnitude for numbers, character
/// count for strings, element count for arrays. Other types are skipped.
fn check_min(name: &str, value: &Value, min: f64) -> Option<String> {
    match value {
        Value::Number(n) => (n.as_f64()? < min)
            .then(|| format!("the {name} field must be at least {min}")),
        Value::String(s) => ((s.chars().count() as f64) < min)
            .then(|| format!("the {name} field must be at least {min} characters")),
        Value::Array(items) => ((items.len() as f64) < min)
            .then(|| format!("the {name} field must have at least {min} items")),
        _ => None,
    }
}

fn check_max(name: &str, value: &Value, max: f64) -> Option<String> {
    match value {
        Value::Number(n) => (n.as_f64()? > max)
            .then(|| format!("the {name} field may not be greater than {max}")),
        Value::String(s) => ((s.chars().count() as f64) > max)
            .then(|| format!("the {name} field may not be greater than {max} characters")),
        Value::Array(items) => ((items.len() as f64) > max)
            .then(|| format!("the {name} field may not have more than {max} items")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn evaluate(
        rules: &[(&str, &[&str])],
        input: &[(&str, Value)],
    ) -> Result<IndexMap<String, Value>, Errors> {
        let rules: IndexMap<String, Vec<String>> = rules
            .iter()
            .map(|(name, tokens)| {
                (
                    name.to_string(),
                    tokens.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect();
        let input: IndexMap<String, Value> = input
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        RuleEngine::new().evaluate(&rules, &input)
    }

    #[test]
    fn rule_parsing() {
        assert_eq!("required".parse(), Ok(Rule::Required));
        assert_eq!("min:18".parse(), Ok(Rule::Min(18.0)));
        assert_eq!(
            "in:kg,g".parse(),
            Ok(Rule::In(vec!["kg".to_string(), "g".to_string()]))
        );
        assert_eq!("int".parse(), Ok(Rule::Int));
        assert_eq!(
            "min:abc".parse(),
            Ok(Rule::Other("min:abc".to_string()))
        );
        assert_eq!(
            "exotic".parse(),
            Ok(Rule::Other("exotic".to_string()))
        );
    }

    #[test]
    fn required_fails_on_missing_and_blank() {
        let err = evaluate(&[("name", &["required"])], &[]).unwrap_err();
        assert_eq!(err.get("name"), ["the name field is required"]);

        let err = evaluate(&[("name", &["required"])], &[("name", json!(""))]).unwrap_err();
        assert!(!err.is_empty());

        let ok = evaluate(&[("name", &["required"])], &[("name", json!("James"))]);
        assert!(ok.is_ok());
    }

    #[test]
    fn nullable_null_passes_and_skips_other_rules() {
        let ok = evaluate(
            &[("age", &["nullable", "min:18", "int"])],
            &[("age", Value::Null)],
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn min_compares_by_type() {
        let err = evaluate(&[("age", &["min:18"])], &[("age", json!(10))]).unwrap_err();
        assert_eq!(err.get("age"), ["the age field must be at least 18"]);

        let err = evaluate(&[("name", &["min:3"])], &[("name", json!("ab"))]).unwrap_err();
        assert_eq!(err.get("name"), ["the name field must be at least 3 characters"]);

        let ok = evaluate(&[("tags", &["min:1"])], &[("tags", json!(["a"]))]);
        assert!(ok.is_ok());
    }

    #[test]
    fn max_applies_to_string_length() {
        let err = evaluate(
            &[("name", &["max:5"])],
            &[("name", json!("James Franco"))],
        )
        .unwrap_err();
        assert!(!err.get("name").is_empty());

        let ok = evaluate(&[("name", &["max:24"])], &[("name", json!("James Franco"))]);
        assert!(ok.is_ok());
    }

    #[test]
    fn int_rule() {
        assert!(evaluate(&[("age", &["int"])], &[("age", json!(50))]).is_ok());
        assert!(evaluate(&[("age", &["int"])], &[("age", json!("50"))]).is_ok());
        assert!(evaluate(&[("age", &["int"])], &[("age", json!(50.5))]).is_err());
    }

    #[test]
    fn boolean_rule() {
        assert!(evaluate(&[("flag", &["boolean"])], &[("flag", json!(true))]).is_ok());
        assert!(evaluate(&[("flag", &["boolean"])], &[("flag", json!(1))]).is_ok());
        assert!(evaluate(&[("flag", &["boolean"])], &[("flag", json!("yes"))]).is_err());
    }

    #[test]
    fn in_rule_compares_stringified() {
        assert!(evaluate(&[("unit", &["in:kg,g"])], &[("unit", json!("g"))]).is_ok());
        let err = evaluate(&[("unit", &["in:kg,g"])], &[("unit", json!("lb"))]).unwrap_err();
        assert_eq!(err.get("unit"), ["the selected unit is invalid"]);
    }

    #[test]
    fn pattern_rule() {
        assert!(evaluate(
            &[("code", &[r"pattern:^\d{3}$"])],
            &[("code", json!("123"))]
        )
        .is_ok());
        assert!(evaluate(
            &[("code", &[r"pattern:^\d{3}$"])],
            &[("code", json!("12x"))]
        )
        .is_err());
    }

    #[test]
    fn unknown_tokens_are_skipped() {
        let ok = evaluate(
            &[("name", &["exotic_rule", "max:24"])],
            &[("name", json!("James"))],
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn errors_collected_across_fields() {
        let err = evaluate(
            &[("name", &["required"]), ("age", &["min:18"])],
            &[("age", json!(10))],
        )
        .unwrap_err();
        assert_eq!(err.len(), 2);
    }

    #[test]
    fn validated_subset_contains_only_passing_ruled_keys() {
        let validated = evaluate(
            &[("name", &["max:24"]), ("age", &["min:18"])],
            &[("name", json!("James")), ("age", json!(50))],
        )
        .unwrap();
        assert_eq!(validated.len(), 2);

        let validated = evaluate(
            &[("name", &["max:24"])],
            &[("name", json!("James")), ("extra", json!(1))],
        )
        .unwrap();
        assert_eq!(validated.len(), 1);
    }
}
