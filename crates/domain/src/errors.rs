//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Invalid email address format
    #[error("Invalid email address: {0}")]
    InvalidEmailAddress(String),

    /// Unknown bug type name
    #[error("Unknown bug type: {0}")]
    UnknownBugType(String),

    /// Invalid bug identifier
    #[error("Invalid bug id: {0}")]
    InvalidBugId(String),

    /// A required form field was absent or blank
    #[error("Missing required input: {field}")]
    MissingField { field: String },
}

impl DomainError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}
