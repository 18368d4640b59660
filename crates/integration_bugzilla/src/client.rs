//! Bugzilla REST client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::models::{ApiErrorBody, CreatedBug, LoginSession, NewBug, ValidLogin};

/// Bugzilla error codes meaning the caller is not (or no longer) logged in
const AUTH_ERROR_CODES: [i64; 3] = [300, 410, 32000];

/// Bugzilla client errors
#[derive(Debug, Error)]
pub enum BugzillaError {
    /// The server could not be reached
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The request timed out
    #[error("Request timed out")]
    Timeout,

    /// Credentials were rejected or the session token expired
    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    /// Bugzilla answered with an error body
    #[error("{message} (code {code})")]
    Api {
        /// Bugzilla error code
        code: i64,
        /// Bugzilla error message
        message: String,
    },

    /// Non-success HTTP status without an error body
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code
        status: u16,
        /// Start of the response body
        body: String,
    },

    /// The response body could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for BugzillaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::ConnectionFailed(err.to_string())
        }
    }
}

/// Bugzilla server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugzillaConfig {
    /// Installation URL, without the `/rest` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Verify TLS certificates (disable only against staging servers)
    #[serde(default = "default_verify_certs")]
    pub verify_certs: bool,
}

fn default_base_url() -> String {
    "https://bugzilla.example.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_verify_certs() -> bool {
    true
}

impl Default for BugzillaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            verify_certs: default_verify_certs(),
        }
    }
}

/// Bugzilla operations used by the filing workflow
#[async_trait]
pub trait BugzillaClient: Send + Sync {
    /// Log in and obtain an API token
    async fn login(&self, login: &str, password: &str) -> Result<LoginSession, BugzillaError>;

    /// Check that a token is still valid for `login`
    async fn valid_login(&self, login: &str, token: &str) -> Result<bool, BugzillaError>;

    /// Invalidate a token
    async fn logout(&self, token: &str) -> Result<(), BugzillaError>;

    /// Create a bug, returning its id
    async fn create_bug(&self, token: &str, bug: &NewBug) -> Result<u64, BugzillaError>;

    /// Installation URL
    fn base_url(&self) -> &str;
}

/// reqwest-based client
#[derive(Debug)]
pub struct HttpBugzillaClient {
    client: Client,
    config: BugzillaConfig,
}

impl HttpBugzillaClient {
    /// Create a client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: BugzillaConfig) -> Result<Self, BugzillaError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.verify_certs)
            .build()
            .map_err(|e| BugzillaError::ConnectionFailed(e.to_string()))?;

        if !config.verify_certs {
            warn!(base_url = %config.base_url, "TLS certificate verification disabled");
        }

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/rest/{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Decode a response, turning error bodies into [`BugzillaError`]
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BugzillaError> {
        let status = response.status();
        let body = response.text().await?;

        let api_error = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .filter(|e| e.error || !status.is_success())
            .and_then(|e| e.code.map(|code| (code, e.message.unwrap_or_default())));

        if let Some((code, message)) = api_error {
            debug!(code, %message, "Bugzilla returned an error");
            if AUTH_ERROR_CODES.contains(&code) {
                return Err(BugzillaError::AuthenticationRequired(message));
            }
            return Err(BugzillaError::Api { code, message });
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(BugzillaError::AuthenticationRequired(
                "HTTP 401 Unauthorized".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(BugzillaError::Http {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| BugzillaError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl BugzillaClient for HttpBugzillaClient {
    #[instrument(skip(self, password))]
    async fn login(&self, login: &str, password: &str) -> Result<LoginSession, BugzillaError> {
        let response = self
            .client
            .get(self.endpoint("login"))
            .query(&[("login", login), ("password", password)])
            .send()
            .await?;

        let session: LoginSession = Self::decode(response).await?;
        debug!(user_id = session.id, "Logged in to Bugzilla");
        Ok(session)
    }

    #[instrument(skip(self, token))]
    async fn valid_login(&self, login: &str, token: &str) -> Result<bool, BugzillaError> {
        let response = self
            .client
            .get(self.endpoint("valid_login"))
            .query(&[("login", login), ("token", token)])
            .send()
            .await?;

        let valid: ValidLogin = Self::decode(response).await?;
        Ok(valid.result)
    }

    #[instrument(skip(self, token))]
    async fn logout(&self, token: &str) -> Result<(), BugzillaError> {
        let response = self
            .client
            .get(self.endpoint("logout"))
            .query(&[("token", token)])
            .send()
            .await?;

        let _: serde_json::Value = Self::decode(response).await?;
        Ok(())
    }

    #[instrument(skip(self, token, bug), fields(product = %bug.product, component = %bug.component))]
    async fn create_bug(&self, token: &str, bug: &NewBug) -> Result<u64, BugzillaError> {
        let response = self
            .client
            .post(self.endpoint("bug"))
            .query(&[("token", token)])
            .json(bug)
            .send()
            .await?;

        let created: CreatedBug = Self::decode(response).await?;
        debug!(bug_id = created.id, "Bug created");
        Ok(created.id)
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }
}
