//! Tracker bug identifier

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Identifier of a bug created in the tracker
///
/// Bugzilla numbers bugs from 1; zero is never a valid id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct BugId(u64);

impl BugId {
    /// Create a bug id, rejecting zero
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBugId`] for zero.
    pub fn new(id: u64) -> Result<Self, DomainError> {
        if id == 0 {
            return Err(DomainError::InvalidBugId(id.to_string()));
        }
        Ok(Self(id))
    }

    /// Get the numeric value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for BugId {
    type Error = DomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BugId> for u64 {
    fn from(id: BugId) -> Self {
        id.0
    }
}

impl FromStr for BugId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<u64>()
            .map_err(|_| DomainError::InvalidBugId(s.to_string()))?;
        Self::new(id)
    }
}
