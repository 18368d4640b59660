//! Per-bug-type tracker defaults

use std::collections::BTreeMap;

use domain::BugType;
use serde::{Deserialize, Serialize};

/// Fields every created bug needs besides its content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugDefaults {
    #[serde(default = "default_product")]
    pub product: String,
    #[serde(default = "default_component")]
    pub component: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_all")]
    pub op_sys: String,
    #[serde(default = "default_all")]
    pub platform: String,
}

fn default_product() -> String {
    "Worker Management".to_string()
}

fn default_component() -> String {
    "General".to_string()
}

fn default_version() -> String {
    "unspecified".to_string()
}

fn default_all() -> String {
    "All".to_string()
}

impl Default for BugDefaults {
    fn default() -> Self {
        Self {
            product: default_product(),
            component: default_component(),
            version: default_version(),
            op_sys: default_all(),
            platform: default_all(),
        }
    }
}

/// Bug defaults keyed by bug type name
///
/// Keys are parsed like [`BugType`] (`hardware-request` and
/// `hardware_request` both work). A `default` entry applies to types
/// without their own entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BugDefaultsConfig {
    entries: BTreeMap<String, BugDefaults>,
}

impl BugDefaultsConfig {
    /// Defaults for one bug type
    #[must_use]
    pub fn for_type(&self, bug_type: BugType) -> BugDefaults {
        self.entries
            .iter()
            .find(|(key, _)| key.parse::<BugType>().is_ok_and(|parsed| parsed == bug_type))
            .or_else(|| self.entries.get_key_value("default"))
            .map(|(_, defaults)| defaults.clone())
            .unwrap_or_default()
    }

    /// Set the defaults for one bug type
    pub fn insert(&mut self, bug_type: BugType, defaults: BugDefaults) {
        self.entries.insert(bug_type.as_str().to_string(), defaults);
    }
}
