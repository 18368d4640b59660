#![forbid(unsafe_code)]
//! Bugzilla integration
//!
//! Client for the Bugzilla REST API (`/rest`): login, session validity
//! checks and bug creation.

pub mod client;
mod models;

pub use client::{BugzillaClient, BugzillaConfig, BugzillaError, HttpBugzillaClient};
pub use models::{LoginSession, NewBug};
