//! Normalized directory entry for a person

use serde::{Deserialize, Serialize};

/// A person as known to the directory
///
/// The shape is stable regardless of how the directory names its
/// attributes. Records are read-only inputs to filing and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    /// Primary mail address
    pub email: String,
    /// Display name
    pub common_name: Option<String>,
    /// Job title
    pub title: Option<String>,
    /// Address used in the tracker; equals `email` unless the directory
    /// carries a tracker-specific one
    pub bugzilla_email: String,
    /// Employee type (e.g. "Employee", "Contractor")
    pub employee_type: Option<String>,
}

impl DirectoryRecord {
    /// Create a record whose tracker address is its primary address
    pub fn new(email: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            bugzilla_email: email.clone(),
            email,
            common_name: None,
            title: None,
            employee_type: None,
        }
    }

    /// Set the tracker-specific address
    #[must_use]
    pub fn with_bugzilla_email(mut self, bugzilla_email: impl Into<String>) -> Self {
        self.bugzilla_email = bugzilla_email.into();
        self
    }

    /// Display name, falling back to the mail address
    pub fn display_name(&self) -> &str {
        self.common_name.as_deref().unwrap_or(&self.email)
    }
}
