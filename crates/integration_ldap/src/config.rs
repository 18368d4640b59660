//! LDAP client configuration

use std::{fmt, time::Duration};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Directory server configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct LdapConfig {
    /// Server URL (e.g., `ldaps://ldap.example.com`)
    #[serde(default = "default_url")]
    pub url: String,

    /// Search base
    #[serde(default)]
    pub base_dn: String,

    /// DN used for the anonymous bind that precedes DN resolution
    #[serde(default)]
    pub anon_bind_dn: String,

    /// Password for the anonymous bind (excluded from serialization)
    #[serde(skip_serializing, default = "empty_secret")]
    pub anon_password: SecretString,

    /// Optional template building the user DN directly, e.g.
    /// `mail={email},o=com,dc=example`. When unset the DN is found by search.
    #[serde(default)]
    pub user_dn_template: Option<String>,

    /// TTL of cached employee listings in seconds (0 disables caching)
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Timeout for each connect, bind and search in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for LdapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LdapConfig")
            .field("url", &self.url)
            .field("base_dn", &self.base_dn)
            .field("anon_bind_dn", &self.anon_bind_dn)
            .field("anon_password", &"[REDACTED]")
            .field("user_dn_template", &self.user_dn_template)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_url() -> String {
    "ldap://localhost:389".to_string()
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

const fn default_cache_ttl_secs() -> u64 {
    300
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for LdapConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            base_dn: String::new(),
            anon_bind_dn: String::new(),
            anon_password: empty_secret(),
            user_dn_template: None,
            cache_ttl_secs: default_cache_ttl_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LdapConfig {
    /// Per-operation timeout; callers reject a zero value before connecting
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Listing cache TTL, `None` when caching is disabled
    #[must_use]
    pub const fn cache_ttl(&self) -> Option<Duration> {
        if self.cache_ttl_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.cache_ttl_secs))
        }
    }
}

/// Session credentials the client binds as
#[derive(Clone)]
pub struct LdapCredentials {
    /// The session user's mail address
    pub email: String,
    /// The session user's password
    pub password: SecretString,
}

impl LdapCredentials {
    /// Create session credentials
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }
}

impl fmt::Debug for LdapCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LdapCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
