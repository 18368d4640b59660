//! Bug filing categories
//!
//! The set of bug types is closed: each variant has exactly one template in
//! the application layer's builder table.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A known filing template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BugType {
    /// Laptop/desktop and peripherals for an incoming worker
    HardwareRequest,
    /// HR onboarding for a new employee
    NewHireSetup,
    /// Onboarding for a contractor
    ContractorSetup,
    /// Company mail account creation
    EmailSetup,
}

impl BugType {
    /// All bug types, in declaration order
    pub const ALL: [Self; 4] = [
        Self::HardwareRequest,
        Self::NewHireSetup,
        Self::ContractorSetup,
        Self::EmailSetup,
    ];

    /// Stable kebab-case name, also used as the configuration key
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HardwareRequest => "hardware-request",
            Self::NewHireSetup => "new-hire-setup",
            Self::ContractorSetup => "contractor-setup",
            Self::EmailSetup => "email-setup",
        }
    }
}

impl fmt::Display for BugType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BugType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|bug_type| bug_type.as_str() == wanted)
            .ok_or_else(|| DomainError::UnknownBugType(s.to_string()))
    }
}
