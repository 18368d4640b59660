//! Wire-protocol seam
//!
//! [`DirectoryClient`](crate::DirectoryClient) only talks to these traits;
//! [`Ldap3Connector`] implements them on top of the `ldap3` crate.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchEntry};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{config::LdapConfig, entry::RawEntry};

/// Failure reported by the wire protocol
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ProtocolError(pub String);

impl From<ldap3::LdapError> for ProtocolError {
    fn from(err: ldap3::LdapError) -> Self {
        Self(err.to_string())
    }
}

/// One open connection to a directory server
#[async_trait]
pub trait DirectoryConnection: Send {
    /// Simple bind
    async fn bind(&mut self, dn: &str, password: &str) -> Result<(), ProtocolError>;

    /// Subtree search under `base`
    async fn search(
        &mut self,
        base: &str,
        filter: &str,
        attributes: &[&str],
    ) -> Result<Vec<RawEntry>, ProtocolError>;

    /// Release the connection
    async fn unbind(&mut self) -> Result<(), ProtocolError>;
}

/// Opens connections
#[async_trait]
pub trait DirectoryConnector: Send + Sync {
    /// Open a new, unbound connection
    async fn connect(&self) -> Result<Box<dyn DirectoryConnection>, ProtocolError>;
}

/// Connector for real LDAP servers
#[derive(Debug, Clone)]
pub struct Ldap3Connector {
    url: String,
    timeout: Duration,
}

impl Ldap3Connector {
    /// Create a connector for the configured server
    #[must_use]
    pub fn new(config: &LdapConfig) -> Self {
        Self {
            url: config.url.clone(),
            timeout: config.timeout(),
        }
    }
}

#[async_trait]
impl DirectoryConnector for Ldap3Connector {
    async fn connect(&self) -> Result<Box<dyn DirectoryConnection>, ProtocolError> {
        let settings = LdapConnSettings::new().set_conn_timeout(self.timeout);
        let (conn, ldap) = LdapConnAsync::with_settings(settings, &self.url).await?;

        let url = self.url.clone();
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(%url, error = %e, "LDAP connection terminated");
            }
        });

        debug!(url = %self.url, "Connected to directory");
        Ok(Box::new(Ldap3Connection { ldap }))
    }
}

struct Ldap3Connection {
    ldap: Ldap,
}

impl fmt::Debug for Ldap3Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ldap3Connection").finish_non_exhaustive()
    }
}

#[async_trait]
impl DirectoryConnection for Ldap3Connection {
    async fn bind(&mut self, dn: &str, password: &str) -> Result<(), ProtocolError> {
        self.ldap.simple_bind(dn, password).await?.success()?;
        Ok(())
    }

    async fn search(
        &mut self,
        base: &str,
        filter: &str,
        attributes: &[&str],
    ) -> Result<Vec<RawEntry>, ProtocolError> {
        let (entries, _) = self
            .ldap
            .search(base, Scope::Subtree, filter, attributes.to_vec())
            .await?
            .success()?;

        Ok(entries
            .into_iter()
            .map(|entry| RawEntry::from(SearchEntry::construct(entry)))
            .collect())
    }

    async fn unbind(&mut self) -> Result<(), ProtocolError> {
        self.ldap.unbind().await?;
        Ok(())
    }
}
