//! Notification port
//!
//! Delivers user-visible messages (success notices, failure warnings) to
//! whatever renders them for the current session.

use domain::Severity;
#[cfg(test)]
use mockall::automock;

/// Session message sink
#[cfg_attr(test, automock)]
pub trait NotificationPort: Send + Sync {
    /// Queue a message for the user
    fn notify(&self, message: &str, severity: Severity);
}
