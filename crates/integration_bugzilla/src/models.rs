//! Bugzilla REST request and response bodies

use std::fmt;

use serde::{Deserialize, Serialize};

/// Session returned by `GET /rest/login`
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginSession {
    /// Numeric user id
    pub id: u64,
    /// API token used for subsequent calls
    pub token: String,
}

impl fmt::Debug for LoginSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginSession")
            .field("id", &self.id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST /rest/bug`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewBug {
    pub product: String,
    pub component: String,
    pub version: String,
    pub summary: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    pub op_sys: String,
    pub rep_platform: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedBug {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidLogin {
    pub result: bool,
}

/// Error body, e.g. `{"error": true, "code": 32000, "message": "..."}`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub error: bool,
    pub code: Option<i64>,
    pub message: Option<String>,
}
