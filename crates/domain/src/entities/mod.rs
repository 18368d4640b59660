//! Domain entities

mod bug_payload;
mod bug_type;
mod directory_record;
mod filing_result;
mod form_input;

pub use bug_payload::BugPayload;
pub use bug_type::BugType;
pub use directory_record::DirectoryRecord;
pub use filing_result::{FailureAction, FailureKind, FilingOutcome, FilingResult};
pub use form_input::FormInput;
