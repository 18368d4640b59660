//! Validated form input
//!
//! Field-level validation happens before this type is built. Filing code
//! only reads from it, and every read states what happens when the field
//! is missing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Read-only mapping from form field name to submitted value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormInput {
    fields: BTreeMap<String, String>,
}

impl FormInput {
    /// Create form input from field/value pairs
    pub fn new<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw lookup; `None` when the field was not submitted
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Lookup for optional fields; absent fields read as the empty string
    pub fn optional(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    /// Whether the field was submitted with a non-blank value
    pub fn flag(&self, field: &str) -> bool {
        !self.optional(field).trim().is_empty()
    }

    /// Lookup for required fields
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingField`] when the field is absent or
    /// contains only whitespace.
    pub fn required(&self, field: &str) -> Result<&str, DomainError> {
        match self.get(field) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(DomainError::missing_field(field)),
        }
    }

    /// Number of submitted fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether nothing was submitted
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormInput {
        FormInput::new([("fullname", "Jane Doe"), ("end_date", ""), ("notes", "  ")])
    }

    #[test]
    fn get_distinguishes_absent_from_empty() {
        let form = form();
        assert_eq!(form.get("end_date"), Some(""));
        assert_eq!(form.get("start_date"), None);
    }

    #[test]
    fn optional_defaults_to_empty() {
        assert_eq!(form().optional("start_date"), "");
        assert_eq!(form().optional("fullname"), "Jane Doe");
    }

    #[test]
    fn required_rejects_absent_and_blank() {
        let form = form();
        assert_eq!(form.required("fullname").unwrap(), "Jane Doe");
        assert!(matches!(
            form.required("start_date"),
            Err(DomainError::MissingField { ref field }) if field == "start_date"
        ));
        assert!(form.required("end_date").is_err());
        assert!(form.required("notes").is_err());
    }

    #[test]
    fn flag_is_false_for_blank() {
        let form = FormInput::new([("mail_needed", "1"), ("machine_needed", "")]);
        assert!(form.flag("mail_needed"));
        assert!(!form.flag("machine_needed"));
        assert!(!form.flag("absent"));
    }

    #[test]
    fn deserializes_from_json_object() {
        let form: FormInput = serde_json::from_str(r#"{"fullname":"Jane"}"#).unwrap();
        assert_eq!(form.len(), 1);
        assert_eq!(form.get("fullname"), Some("Jane"));
    }
}
