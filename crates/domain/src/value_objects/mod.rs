//! Value Objects - Immutable, identity-less domain primitives

mod bug_id;
mod email_address;
mod role_filter;
mod severity;

pub use bug_id::BugId;
pub use email_address::EmailAddress;
pub use role_filter::RoleFilter;
pub use severity::Severity;
