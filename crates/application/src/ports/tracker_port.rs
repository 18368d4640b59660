//! Tracker port
//!
//! An authenticated session against the bug tracker. The filing workflow
//! only needs to know whether the session is usable, how to submit a
//! payload and where bugs can be viewed.

use async_trait::async_trait;
use domain::{BugId, BugPayload};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Config key holding the tracker's base URL
pub const TRACKER_BASE_URL_KEY: &str = "bugzilla_url";

/// Tracker port errors
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The tracker refused the session credentials
    #[error("Tracker authentication required")]
    AuthenticationRequired,

    /// The tracker answered the request with an error
    #[error("{message}")]
    Rejected { code: Option<i64>, message: String },

    /// The tracker could not be reached or answered garbage
    #[error("Tracker unavailable: {0}")]
    Unavailable(String),

    /// The tracker did not answer in time
    #[error("Tracker request timed out")]
    Timeout,
}

/// Tracker session port
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TrackerPort: Send + Sync {
    /// Whether the session can currently be used to file bugs
    async fn authenticated(&self) -> bool;

    /// Session check that keeps "invalid session" apart from "tracker unreachable"
    ///
    /// `Ok(false)` means the tracker answered and the session is not valid.
    async fn session_status(&self) -> Result<bool, TrackerError> {
        Ok(self.authenticated().await)
    }

    /// Create a bug and return its id
    async fn submit(&self, payload: &BugPayload) -> Result<BugId, TrackerError>;

    /// Read a tracker configuration value (e.g. [`TRACKER_BASE_URL_KEY`])
    fn config(&self, key: &str) -> Option<String>;
}

/// Link to a bug in the tracker's web UI
pub fn bug_link(base_url: &str, bug_id: BugId) -> String {
    format!("{}/show_bug.cgi?id={bug_id}", base_url.trim_end_matches('/'))
}
