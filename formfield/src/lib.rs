//! Declarative form-field definitions
//!
//! `formfield` builds form schemas out of typed field definitions. Each field
//! carries display metadata (label, placeholder, hint), validation rules
//! (required, nullable, min/max, custom rule tokens), and an open metadata
//! bag for everything else (options lists, conditional visibility, UI flags).
//! Fields are filled from plain data, mutated through fluent builders,
//! validated individually or as a batch, and serialized to a flat map for
//! transport to a UI layer.
//!
//! # Architecture
//!
//! - **Shared structure**: every input kind shares one attribute-plus-metadata
//!   structure ([`Field`]); the kinds are a closed sum type ([`InputKind`])
//! - **Typed builders**: [`Text`], [`Textarea`], [`Number`], [`Boolean`],
//!   [`Radio`], and [`Select`] fix the input kind and add kind-specific
//!   fluent methods; the shared surface comes from the [`Input`] trait
//! - **Injected validation**: rule tokens are handed to a
//!   [`ValidationEngine`]; [`RuleEngine`] is the built-in implementation
//!
//! ```
//! use formfield::{Input, Number, RuleEngine, Text};
//!
//! let engine = RuleEngine::new();
//! let age = Number::new("How old are you?").name("age").integer(true).min(18);
//! assert!(!age.validate(&engine, 10, false).unwrap());
//! let name = Text::new("Whats your name?").rules(["max:24"]).required(true);
//! assert!(name.validate(&engine, "James", false).unwrap());
//! ```

pub mod engine;
pub mod error;
pub mod field;
pub mod inputs;
pub mod meta;
pub mod options;
pub mod validation;

pub use engine::{Rule, RuleEngine};
pub use error::{FieldError, Result};
pub use field::{Field, InputKind};
pub use inputs::{Boolean, Input, Number, Radio, Select, Text, Textarea};
pub use meta::Meta;
pub use options::{ConditionalOptions, OptionCondition, SelectOption};
pub use validation::{validate_input, validator, Errors, ValidationEngine, Validator};
