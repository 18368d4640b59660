//! LDAP directory configuration

use integration_ldap::LdapConfig;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Directory server configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct DirectoryAppConfig {
    /// Server URL (e.g., `ldaps://ldap.example.com`)
    #[serde(default = "default_url")]
    pub url: String,

    /// Search base
    #[serde(default)]
    pub base_dn: String,

    /// DN for the anonymous bind preceding user DN resolution
    #[serde(default)]
    pub anon_bind_dn: String,

    /// Password for the anonymous bind (sensitive - uses `SecretString`)
    #[serde(skip_serializing, default = "empty_secret")]
    pub anon_password: SecretString,

    /// Template building the user DN directly (`{email}` is replaced)
    #[serde(default)]
    pub user_dn_template: Option<String>,

    /// Employee listing cache TTL in seconds (0 disables)
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Per-operation timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for DirectoryAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryAppConfig")
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

impl Default for DirectoryAppConfig {
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

impl DirectoryAppConfig {
    /// Convert to `integration_ldap`'s `LdapConfig`
    #[must_use]
    pub fn to_ldap_config(&self) -> LdapConfig {
        LdapConfig {
            url: self.url.clone(),
            base_dn: self.base_dn.clone(),
            anon_bind_dn: self.anon_bind_dn.clone(),
            anon_password: self.anon_password.clone(),
            user_dn_template: self.user_dn_template.clone(),
            cache_ttl_secs: self.cache_ttl_secs,
            timeout_secs: self.timeout_secs,
        }
    }
}
