//! Application configuration
//!
//! Split into focused sub-modules:
//! - `directory`: LDAP directory settings
//! - `tracker`: per-bug-type Bugzilla defaults
//!
//! Bugzilla connection settings and telemetry settings reuse the structs of
//! `integration_bugzilla` and [`crate::telemetry`].

mod directory;
mod tracker;

use std::{fmt, path::Path};

use application::BuilderConfig;
use integration_bugzilla::BugzillaConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use directory::DirectoryAppConfig;
pub use tracker::{BugDefaults, BugDefaultsConfig};

use crate::telemetry::TelemetryConfig;

/// Prefix of environment variable overrides, e.g. `WORKERMGMT_DIRECTORY__BASE_DN`
pub const ENV_PREFIX: &str = "WORKERMGMT";

/// Application environment (development or production)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Production environment
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment
    #[serde(default)]
    pub environment: Option<Environment>,

    /// Company mail domain used to derive new accounts' addresses
    #[serde(default = "default_mail_domain")]
    pub mail_domain: String,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// LDAP directory configuration
    #[serde(default)]
    pub directory: DirectoryAppConfig,

    /// Bugzilla server configuration
    #[serde(default)]
    pub bugzilla: BugzillaConfig,

    /// Product, component and version per bug type
    #[serde(default)]
    pub bug_defaults: BugDefaultsConfig,
}

fn default_mail_domain() -> String {
    "example.com".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: None,
            mail_domain: default_mail_domain(),
            telemetry: TelemetryConfig::default(),
            directory: DirectoryAppConfig::default(),
            bugzilla: BugzillaConfig::default(),
            bug_defaults: BugDefaultsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `config.toml` (optional) and `WORKERMGMT_*`
    /// environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (or `config.toml` when
    /// `None`), then apply environment overrides
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config = config::Config::builder()
            .set_default("mail_domain", default_mail_domain())?
            .add_source(file)
            // Nested keys use a double underscore: WORKERMGMT_BUGZILLA__BASE_URL
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;
        debug!(
            environment = %app_config.environment.unwrap_or_default(),
            bugzilla = %app_config.bugzilla.base_url,
            directory = %app_config.directory.url,
            "Configuration loaded"
        );
        Ok(app_config)
    }

    /// Reject settings that would make every request fail or that are
    /// unsafe outside development
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.directory.timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "directory.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.bugzilla.timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "bugzilla.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.environment == Some(Environment::Production) && !self.bugzilla.verify_certs {
            return Err(config::ConfigError::Message(
                "bugzilla.verify_certs cannot be disabled in production".to_string(),
            ));
        }
        Ok(())
    }

    /// Settings for the payload builder
    #[must_use]
    pub fn builder_config(&self) -> BuilderConfig {
        BuilderConfig {
            mail_domain: self.mail_domain.clone(),
        }
    }
}
