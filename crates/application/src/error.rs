//! Application-level errors

use domain::{DomainError, FailureKind};
use thiserror::Error;

use crate::ports::{DirectoryLookupError, TrackerError};

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Input needed to build a bug could not be resolved
    #[error("Missing required input: {0}")]
    MissingInput(String),

    /// The tracker session is not (or no longer) authenticated
    #[error("Tracker session is not authenticated")]
    NotAuthenticated,

    /// Tracker error
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// Directory error
    #[error(transparent)]
    Directory(#[from] DirectoryLookupError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Classify this error for the filing workflow
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::NotAuthenticated | Self::Tracker(TrackerError::AuthenticationRequired) => {
                FailureKind::AuthenticationFailed
            },
            Self::MissingInput(_) | Self::Domain(DomainError::MissingField { .. }) => {
                FailureKind::MissingInput
            },
            Self::Tracker(_) => FailureKind::TrackerInteraction,
            Self::Domain(_) | Self::Directory(_) | Self::Configuration(_) | Self::Internal(_) => {
                FailureKind::Unknown
            },
        }
    }
}
