//! Directory adapter - Implements DirectoryPort using integration_ldap

use std::sync::Arc;

use application::ports::{DirectoryLookupError, DirectoryPort};
use async_trait::async_trait;
use domain::{DirectoryRecord, EmailAddress, RoleFilter};
use integration_ldap::{
    DirectoryClient, EmployeeFilter, Ldap3Connector, LdapCredentials, LdapError, LdapPerson,
};
use tracing::{debug, instrument};

use crate::config::DirectoryAppConfig;

/// Adapter for the LDAP employee directory
#[derive(Debug)]
pub struct LdapDirectoryAdapter {
    client: DirectoryClient,
}

impl LdapDirectoryAdapter {
    /// Wrap an existing client
    pub const fn new(client: DirectoryClient) -> Self {
        Self { client }
    }

    /// Create an adapter for a real server, binding as the session user
    #[must_use]
    pub fn from_config(config: &DirectoryAppConfig, credentials: LdapCredentials) -> Self {
        let ldap_config = config.to_ldap_config();
        let connector = Arc::new(Ldap3Connector::new(&ldap_config));
        Self::new(DirectoryClient::new(ldap_config, credentials, connector))
    }

    /// Unbind from the directory
    pub async fn close(&self) {
        self.client.close().await;
    }

    /// Map integration error to port error
    fn map_error(err: LdapError) -> DirectoryLookupError {
        match err {
            LdapError::NotFound(email) => DirectoryLookupError::NotFound(email),
            LdapError::ConnectionError(reason) => DirectoryLookupError::Unavailable(reason),
            // the session user, not the person looked up, could not be resolved
            err @ (LdapError::AuthError { .. } | LdapError::AmbiguousIdentity { .. }) => {
                DirectoryLookupError::AuthenticationFailed(err.to_string())
            },
        }
    }

    fn to_record(person: LdapPerson) -> DirectoryRecord {
        DirectoryRecord {
            common_name: person.cn,
            title: person.title,
            employee_type: person.employee_type,
            ..DirectoryRecord::new(person.mail).with_bugzilla_email(person.bugzilla_email)
        }
    }

    const fn to_filter(role: RoleFilter) -> EmployeeFilter {
        match role {
            RoleFilter::All => EmployeeFilter::All,
            RoleFilter::ManagersOnly => EmployeeFilter::Managers,
        }
    }
}

#[async_trait]
impl DirectoryPort for LdapDirectoryAdapter {
    #[instrument(skip(self), fields(email = %email.as_str()))]
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<DirectoryRecord, DirectoryLookupError> {
        let record = self
            .client
            .find_by_email(email.as_str())
            .await
            .map(Self::to_record)
            .map_err(Self::map_error)?;

        debug!(name = record.display_name(), "Directory lookup succeeded");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn list_by_role(
        &self,
        role: RoleFilter,
    ) -> Result<Vec<DirectoryRecord>, DirectoryLookupError> {
        let people = self
            .client
            .list_by_role(Self::to_filter(role))
            .await
            .map_err(Self::map_error)?;

        debug!(count = people.len(), "Directory listing succeeded");
        Ok(people.into_iter().map(Self::to_record).collect())
    }
}
