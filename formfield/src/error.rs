//! Error types for field operations

use thiserror::Error;

use crate::validation::Errors;

/// Result type for field operations
pub type Result<T> = std::result::Result<T, FieldError>;

/// Errors that can occur when working with field definitions
///
/// Validation is the only failing operation in this crate. Metadata reads
/// are permissive by design: an absent key reads as `None` or a documented
/// default, never as an error.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FieldError {
    /// One or more field rules failed against the supplied input
    #[error("validation failed: {0}")]
    Validation(Errors),
}

impl FieldError {
    /// The field-to-messages map carried by a validation failure.
    pub fn errors(&self) -> &Errors {
        match self {
            FieldError::Validation(errors) => errors,
        }
    }
}
