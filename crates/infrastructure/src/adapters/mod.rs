//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod bugzilla_tracker_adapter;
mod ldap_directory_adapter;
mod session_messages;

pub use bugzilla_tracker_adapter::BugzillaTrackerAdapter;
pub use ldap_directory_adapter::LdapDirectoryAdapter;
pub use session_messages::{SessionMessage, SessionMessages};
