//! Application services - Use case implementations

mod bug_builder;
mod filing_service;

pub use bug_builder::{BugPayloadBuilder, BuilderConfig, Person, PersonRole};
pub use filing_service::{FilingService, UnhandledFilingError};
