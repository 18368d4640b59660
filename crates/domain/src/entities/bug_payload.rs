//! Bug payload ready for submission to the tracker

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::BugType;

/// The tracker-agnostic content of one bug
///
/// A payload is built fresh for every filing attempt and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugPayload {
    /// Template the payload was built from
    pub bug_type: BugType,
    /// Human-readable name used in messages ("Hardware request")
    pub label: String,
    /// One-line bug summary
    pub summary: String,
    /// Bug description (first comment)
    pub description: String,
    /// CC list, in insertion order, without duplicates or blanks
    pub cc: Vec<String>,
    /// Visibility groups the bug is restricted to
    pub groups: BTreeSet<String>,
}

impl BugPayload {
    /// Create a payload with an empty summary, description, CC list and groups
    pub fn new(bug_type: BugType, label: impl Into<String>) -> Self {
        Self {
            bug_type,
            label: label.into(),
            summary: String::new(),
            description: String::new(),
            cc: Vec::new(),
            groups: BTreeSet::new(),
        }
    }

    /// Add an address to the CC list
    ///
    /// Blank addresses and addresses already present are ignored.
    pub fn add_cc(&mut self, email: &str) {
        let email = email.trim();
        if email.is_empty() || self.cc.iter().any(|existing| existing == email) {
            return;
        }
        self.cc.push(email.to_string());
    }

    /// Restrict the bug to a visibility group
    pub fn add_group(&mut self, group: &str) {
        let group = group.trim();
        if !group.is_empty() {
            self.groups.insert(group.to_string());
        }
    }

    /// Append a block of text to the description, separated by a blank line
    pub fn append_description(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.description.is_empty() {
            self.description.push_str("\n\n");
        }
        self.description.push_str(text);
    }
}
