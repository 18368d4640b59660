//! Directory role filter

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Which directory entries an employee listing should include
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleFilter {
    /// Every enabled employee
    #[default]
    All,
    /// Enabled employees flagged as managers
    ManagersOnly,
}

impl fmt::Display for RoleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::ManagersOnly => write!(f, "managers"),
        }
    }
}

impl FromStr for RoleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "manager" | "managers" | "managers_only" => Ok(Self::ManagersOnly),
            _ => Err(format!("Invalid role filter: {s}. Use 'all' or 'managers'")),
        }
    }
}
