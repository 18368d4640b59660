//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of the LDAP and Bugzilla
//! integrations, and owns configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, BugDefaults, BugDefaultsConfig, DirectoryAppConfig, ENV_PREFIX, Environment,
};
pub use telemetry::{TelemetryConfig, TelemetryError, init_telemetry};
