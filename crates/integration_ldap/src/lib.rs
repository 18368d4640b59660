#![forbid(unsafe_code)]
//! LDAP directory integration
//!
//! Read-only employee lookups against an LDAP directory.
//!
//! # Architecture
//!
//! [`DirectoryClient`] owns the binding state machine (anonymous bind, DN
//! resolution, user bind), search-term escaping, result normalization and a
//! TTL cache for employee listings. The wire protocol sits behind the
//! [`DirectoryConnector`] / [`DirectoryConnection`] traits, implemented for
//! real servers by [`Ldap3Connector`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use integration_ldap::{DirectoryClient, EmployeeFilter, Ldap3Connector, LdapConfig, LdapCredentials};
//! use secrecy::SecretString;
//!
//! let config = LdapConfig::default();
//! let connector = Arc::new(Ldap3Connector::new(&config));
//! let client = DirectoryClient::new(config, LdapCredentials::new("me@example.com", SecretString::from("secret".to_string())), connector);
//!
//! let managers = client.list_by_role(EmployeeFilter::Managers).await?;
//! ```

mod client;
mod config;
mod connection;
mod entry;
mod error;
pub mod escape;

pub use client::{BindState, DirectoryClient, EMPLOYEE_ATTRIBUTES, EmployeeFilter};
pub use config::{LdapConfig, LdapCredentials};
pub use connection::{DirectoryConnection, DirectoryConnector, Ldap3Connector, ProtocolError};
pub use entry::{AttributeValue, LdapPerson, NormalizedEntry, RawEntry, normalize};
pub use error::LdapError;
