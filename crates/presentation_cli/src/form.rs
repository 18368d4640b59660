//! Loading submitted forms from JSON files

use std::path::Path;

use domain::FormInput;
use serde_json::Value;
use thiserror::Error;

/// Errors reading a form file
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Failed to read form file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Form file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Form must be a JSON object of field names to values")]
    NotAnObject,

    #[error("Field '{0}' must be a string, number or boolean")]
    UnsupportedValue(String),
}

/// Read a form from a JSON file
pub fn load_form(path: &Path) -> Result<FormInput, FormError> {
    let contents = std::fs::read_to_string(path)?;
    parse_form(&contents)
}

/// Parse a JSON object into form input
///
/// Checkboxes may be given as booleans: `true` reads as a set flag, `false`
/// and `null` leave the field unsubmitted.
pub fn parse_form(contents: &str) -> Result<FormInput, FormError> {
    let Value::Object(map) = serde_json::from_str(contents)? else {
        return Err(FormError::NotAnObject);
    };

    let mut fields = Vec::with_capacity(map.len());
    for (name, value) in map {
        let value = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) | Value::Null => continue,
            Value::Array(_) | Value::Object(_) => return Err(FormError::UnsupportedValue(name)),
        };
        fields.push((name, value));
    }
    Ok(FormInput::new(fields))
}
