//! Directory port
//!
//! Read-only lookups of people in the organization directory.

use async_trait::async_trait;
use domain::{DirectoryRecord, EmailAddress, RoleFilter};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Directory port errors
///
/// "No such person" and "directory unreachable" are always distinct.
#[derive(Debug, Error)]
pub enum DirectoryLookupError {
    /// No entry matched
    #[error("No directory entry for {0}")]
    NotFound(String),

    /// More than one entry matched, or the session identity could not be resolved
    #[error("Ambiguous directory identity: {0}")]
    AmbiguousIdentity(String),

    /// Binding with the session credentials failed
    #[error("Directory authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The directory could not be reached or the search failed
    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

impl DirectoryLookupError {
    /// Whether the error says something about the person looked up rather
    /// than about the directory itself
    pub const fn is_unresolved_person(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::AmbiguousIdentity(_))
    }
}

/// Directory port trait
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DirectoryPort: Send + Sync {
    /// Look up one person by primary mail address
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<DirectoryRecord, DirectoryLookupError>;

    /// List enabled employees, ordered by display name
    async fn list_by_role(
        &self,
        role: RoleFilter,
    ) -> Result<Vec<DirectoryRecord>, DirectoryLookupError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_person_errors() {
        assert!(DirectoryLookupError::NotFound("a@b.com".to_string()).is_unresolved_person());
        assert!(
            DirectoryLookupError::AmbiguousIdentity("a@b.com".to_string()).is_unresolved_person()
        );
        assert!(
            !DirectoryLookupError::Unavailable("timeout".to_string()).is_unresolved_person()
        );
        assert!(
            !DirectoryLookupError::AuthenticationFailed("bad password".to_string())
                .is_unresolved_person()
        );
    }

    #[test]
    fn error_display() {
        let err = DirectoryLookupError::NotFound("boss@example.com".to_string());
        assert_eq!(err.to_string(), "No directory entry for boss@example.com");
    }
}
