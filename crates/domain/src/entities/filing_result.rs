//! Outcome of filing one requested bug type

use std::fmt;

use serde::{Deserialize, Serialize};

use super::BugType;
use crate::value_objects::BugId;

/// Classification of a failed filing attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The tracker session is expired or invalid
    AuthenticationFailed,
    /// A required form field was absent
    MissingInput,
    /// The tracker accepted the request but answered with an error
    TrackerInteraction,
    /// Anything not covered above
    Unknown,
}

/// What the caller is expected to do about a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureAction {
    /// Stop the batch and log in again
    Reauthenticate,
    /// Tell the user and carry on with the next bug
    Report,
    /// Tell the user, carry on, then hand the fault to the operator boundary
    Escalate,
}

impl FailureKind {
    /// Recovery action for this kind of failure
    pub const fn action(self) -> FailureAction {
        match self {
            Self::AuthenticationFailed => FailureAction::Reauthenticate,
            Self::MissingInput | Self::TrackerInteraction => FailureAction::Report,
            Self::Unknown => FailureAction::Escalate,
        }
    }

    /// Whether the remaining bugs of the batch must not be attempted
    pub const fn aborts_batch(self) -> bool {
        matches!(self.action(), FailureAction::Reauthenticate)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthenticationFailed => write!(f, "authentication failed"),
            Self::MissingInput => write!(f, "missing input"),
            Self::TrackerInteraction => write!(f, "tracker interaction"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// What happened to a single requested bug
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FilingOutcome {
    /// The bug was created
    Filed { bug_id: BugId },
    /// The bug was not created
    Failed { kind: FailureKind, detail: String },
}

/// One entry per requested bug type, in request order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingResult {
    pub bug_type: BugType,
    pub outcome: FilingOutcome,
}

impl FilingResult {
    /// A successful filing
    pub const fn filed(bug_type: BugType, bug_id: BugId) -> Self {
        Self {
            bug_type,
            outcome: FilingOutcome::Filed { bug_id },
        }
    }

    /// A failed filing
    pub fn failed(bug_type: BugType, kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            bug_type,
            outcome: FilingOutcome::Failed {
                kind,
                detail: detail.into(),
            },
        }
    }

    /// The created bug, if any
    pub const fn bug_id(&self) -> Option<BugId> {
        match self.outcome {
            FilingOutcome::Filed { bug_id } => Some(bug_id),
            FilingOutcome::Failed { .. } => None,
        }
    }

    /// The failure classification, if any
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        match self.outcome {
            FilingOutcome::Filed { .. } => None,
            FilingOutcome::Failed { kind, .. } => Some(kind),
        }
    }
}
