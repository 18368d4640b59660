//! LDAP error types

use thiserror::Error;

/// Errors that can occur during directory operations
///
/// A failed lookup never degrades into an empty result: callers can always
/// tell "no such person" from "directory unreachable".
#[derive(Debug, Error)]
pub enum LdapError {
    /// The directory could not be reached, the anonymous bind failed, a
    /// search failed or an operation timed out
    #[error("Directory connection error: {0}")]
    ConnectionError(String),

    /// Binding with the session user's DN and password failed
    #[error("Directory authentication failed for {dn}: {reason}")]
    AuthError {
        /// DN the bind was attempted with
        dn: String,
        /// Server or transport message
        reason: String,
    },

    /// The session email did not resolve to exactly one entry
    #[error("Cannot resolve directory identity for {email}: {matches} matching entries")]
    AmbiguousIdentity {
        /// Session email searched for
        email: String,
        /// Number of entries found
        matches: usize,
    },

    /// No entry matched a lookup
    #[error("No directory entry matches {0}")]
    NotFound(String),
}
