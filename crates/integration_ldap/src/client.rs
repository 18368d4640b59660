//! Directory client with lazy binding and cached employee listings

use std::{fmt, sync::Arc, time::Duration};

use moka::future::Cache;
use secrecy::ExposeSecret;
use tokio::{sync::Mutex, time::timeout};
use tracing::{debug, error, instrument, warn};

use crate::{
    config::{LdapConfig, LdapCredentials},
    connection::{DirectoryConnection, DirectoryConnector, ProtocolError},
    entry::{LdapPerson, RawEntry, normalize},
    error::LdapError,
    escape::{equality_filter, escape_dn_value},
};

/// Attributes requested for every employee search
pub const EMPLOYEE_ATTRIBUTES: [&str; 5] = ["mail", "employeetype", "bugzillaEmail", "cn", "title"];

/// Employee listing filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeFilter {
    /// Every active employee
    All,
    /// Active employees flagged as managers
    Managers,
}

impl EmployeeFilter {
    /// LDAP search filter
    pub const fn filter(self) -> &'static str {
        match self {
            Self::All => "(&(objectClass=mozComPerson)(!(employeetype=DISABLED)))",
            Self::Managers => {
                "(&(objectClass=mozComPerson)(isManager=TRUE)(!(employeetype=DISABLED)))"
            },
        }
    }
}

/// Where the session is in the bind sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindState {
    /// No usable connection
    #[default]
    Unbound,
    /// Bound with the anonymous DN, user DN not yet bound
    AnonBound,
    /// Bound as the session user
    UserBound,
}

#[derive(Default)]
struct DirectorySession {
    state: BindState,
    user_dn: Option<String>,
    connection: Option<Box<dyn DirectoryConnection>>,
}

impl DirectorySession {
    fn reset(&mut self) {
        self.state = BindState::Unbound;
        self.user_dn = None;
        self.connection = None;
    }
}

impl fmt::Debug for DirectorySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectorySession")
            .field("state", &self.state)
            .field("user_dn", &self.user_dn)
            .field("connected", &self.connection.is_some())
            .finish()
    }
}

type ListingCache = Cache<EmployeeFilter, Arc<Vec<LdapPerson>>>;

fn listing_cache(ttl: Duration) -> ListingCache {
    Cache::builder().max_capacity(16).time_to_live(ttl).build()
}

/// Read-only employee directory client
///
/// The first operation connects, binds with the anonymous DN, resolves the
/// session user's DN and binds as that user. The user binding is kept until
/// a failure or [`close`](Self::close); the next call then starts over.
pub struct DirectoryClient {
    config: LdapConfig,
    credentials: LdapCredentials,
    connector: Arc<dyn DirectoryConnector>,
    session: Mutex<DirectorySession>,
    listings: Option<ListingCache>,
}

impl fmt::Debug for DirectoryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryClient")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .field("cache_enabled", &self.listings.is_some())
            .finish_non_exhaustive()
    }
}

impl DirectoryClient {
    /// Create a client; nothing is opened until the first lookup
    pub fn new(
        config: LdapConfig,
        credentials: LdapCredentials,
        connector: Arc<dyn DirectoryConnector>,
    ) -> Self {
        let listings = config.cache_ttl().map(listing_cache);
        Self {
            config,
            credentials,
            connector,
            session: Mutex::new(DirectorySession::default()),
            listings,
        }
    }

    /// Override the listing cache TTL (zero disables caching)
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.listings = (!ttl.is_zero()).then(|| listing_cache(ttl));
        self
    }

    /// Current bind state
    pub async fn bind_state(&self) -> BindState {
        self.session.lock().await.state
    }

    /// Look up one employee by mail address
    ///
    /// The first matching entry wins. Never cached.
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<LdapPerson, LdapError> {
        let filter = equality_filter("mail", email);
        let entries = self.search_as_user(&filter).await?;
        if entries.len() > 1 {
            warn!(%filter, matches = entries.len(), "Several entries share a mail address");
        }

        entries
            .into_iter()
            .map(normalize)
            .find_map(|entry| LdapPerson::from_entry(&entry))
            .ok_or_else(|| LdapError::NotFound(email.to_string()))
    }

    /// List employees matching a filter, ordered by common name
    #[instrument(skip(self))]
    pub async fn list_by_role(&self, filter: EmployeeFilter) -> Result<Vec<LdapPerson>, LdapError> {
        let Some(cache) = &self.listings else {
            return self.fetch_listing(filter).await;
        };

        if let Some(people) = cache.get(&filter).await {
            debug!(?filter, "Employee listing cache hit");
            return Ok(people.as_ref().clone());
        }

        let people = Arc::new(self.fetch_listing(filter).await?);
        cache.insert(filter, Arc::clone(&people)).await;
        Ok(people.as_ref().clone())
    }

    /// Unbind and drop the connection
    pub async fn close(&self) {
        let mut session = self.session.lock().await;
        if let Some(mut connection) = session.connection.take() {
            if let Err(e) = connection.unbind().await {
                debug!(error = %e, "Unbind failed");
            }
        }
        session.reset();
    }

    async fn fetch_listing(&self, filter: EmployeeFilter) -> Result<Vec<LdapPerson>, LdapError> {
        let entries = self.search_as_user(filter.filter()).await?;
        let mut people: Vec<LdapPerson> = entries
            .into_iter()
            .map(normalize)
            .filter_map(|entry| LdapPerson::from_entry(&entry))
            .collect();
        people.sort_by(|a, b| a.cn.cmp(&b.cn));
        debug!(?filter, count = people.len(), "Fetched employee listing");
        Ok(people)
    }

    async fn search_as_user(&self, filter: &str) -> Result<Vec<RawEntry>, LdapError> {
        let mut session = self.session.lock().await;
        self.ensure_user_bound(&mut session).await?;

        let result = match session.connection.as_mut() {
            Some(connection) => {
                self.bounded(
                    "search",
                    connection.search(&self.config.base_dn, filter, &EMPLOYEE_ATTRIBUTES),
                )
                .await
            },
            None => Err("no open connection".to_string()),
        };

        result.map_err(|reason| {
            error!(
                base_dn = %self.config.base_dn,
                %filter,
                state = ?session.state,
                %reason,
                "Directory search failed"
            );
            session.reset();
            LdapError::ConnectionError(reason)
        })
    }

    async fn ensure_user_bound(&self, session: &mut DirectorySession) -> Result<(), LdapError> {
        if session.state == BindState::UserBound {
            return Ok(());
        }

        let outcome = self.bind_sequence(session).await;
        if let Err(e) = &outcome {
            warn!(state = ?session.state, error = %e, "Directory bind sequence failed");
            session.reset();
        }
        outcome
    }

    async fn bind_sequence(&self, session: &mut DirectorySession) -> Result<(), LdapError> {
        session.reset();

        let mut connection = self
            .bounded("connect", self.connector.connect())
            .await
            .map_err(|reason| {
                error!(url = %self.config.url, %reason, "Failed to connect to directory");
                LdapError::ConnectionError(reason)
            })?;

        self.bounded(
            "anonymous bind",
            connection.bind(
                &self.config.anon_bind_dn,
                self.config.anon_password.expose_secret(),
            ),
        )
        .await
        .map_err(|reason| {
            error!(dn = %self.config.anon_bind_dn, %reason, "Anonymous bind failed");
            LdapError::ConnectionError(reason)
        })?;
        session.state = BindState::AnonBound;

        let user_dn = self.resolve_user_dn(connection.as_mut()).await?;
        debug!(%user_dn, "Resolved user DN");

        let password = self.credentials.password.expose_secret();
        if let Err(reason) = self
            .bounded("user bind", connection.bind(&user_dn, password))
            .await
        {
            error!(%user_dn, %reason, "User bind failed");
            return Err(LdapError::AuthError {
                dn: user_dn,
                reason,
            });
        }

        debug!(%user_dn, "Bound as user");
        session.user_dn = Some(user_dn);
        session.connection = Some(connection);
        session.state = BindState::UserBound;
        Ok(())
    }

    async fn resolve_user_dn(
        &self,
        connection: &mut dyn DirectoryConnection,
    ) -> Result<String, LdapError> {
        let email = &self.credentials.email;
        if let Some(template) = &self.config.user_dn_template {
            return Ok(template.replace("{email}", &escape_dn_value(email)));
        }

        let filter = equality_filter("mail", email);
        let entries = self
            .bounded(
                "identity search",
                connection.search(&self.config.base_dn, &filter, &["mail"]),
            )
            .await
            .map_err(|reason| {
                error!(%filter, %reason, "Identity search failed");
                LdapError::ConnectionError(reason)
            })?;

        match entries.as_slice() {
            [entry] => Ok(entry.dn.clone()),
            other => {
                error!(%filter, matches = other.len(), "Session email does not resolve to one entry");
                Err(LdapError::AmbiguousIdentity {
                    email: email.clone(),
                    matches: other.len(),
                })
            },
        }
    }

    /// Run one protocol operation under the configured timeout
    async fn bounded<T>(
        &self,
        operation: &str,
        fut: impl Future<Output = Result<T, ProtocolError>>,
    ) -> Result<T, String> {
        match timeout(self.config.timeout(), fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(format!("{operation} failed: {e}")),
            Err(_) => Err(format!(
                "{operation} timed out after {}s",
                self.config.timeout_secs
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex as SyncMutex;
    use secrecy::SecretString;

    use super::*;

    #[derive(Debug, Default)]
    struct DirectoryState {
        people: Vec<RawEntry>,
        connects: usize,
        binds: Vec<String>,
        searches: Vec<String>,
        unbinds: usize,
        reject_anonymous: bool,
        reject_password: bool,
        fail_searches: bool,
        stall_connect: bool,
    }

    #[derive(Debug, Clone, Default)]
    struct FakeDirectory {
        state: Arc<SyncMutex<DirectoryState>>,
    }

    impl FakeDirectory {
        fn with_people(people: Vec<RawEntry>) -> Self {
            let directory = Self::default();
            directory.state.lock().people = people;
            directory
        }

        fn searches_for(&self, filter: &str) -> usize {
            self.state.lock().searches.iter().filter(|f| *f == filter).count()
        }
    }

    struct FakeConnection {
        state: Arc<SyncMutex<DirectoryState>>,
    }

    #[async_trait]
    impl DirectoryConnector for FakeDirectory {
        async fn connect(&self) -> Result<Box<dyn DirectoryConnection>, ProtocolError> {
            let stall = {
                let mut state = self.state.lock();
                state.connects += 1;
                state.stall_connect
            };
            if stall {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            Ok(Box::new(FakeConnection {
                state: Arc::clone(&self.state),
            }))
        }
    }

    #[async_trait]
    impl DirectoryConnection for FakeConnection {
        async fn bind(&mut self, dn: &str, _password: &str) -> Result<(), ProtocolError> {
            let mut state = self.state.lock();
            state.binds.push(dn.to_string());
            if dn == ANON_DN && state.reject_anonymous {
                return Err(ProtocolError("anonymous access denied".to_string()));
            }
            if dn != ANON_DN && state.reject_password {
                return Err(ProtocolError("invalidCredentials".to_string()));
            }
            Ok(())
        }

        async fn search(
            &mut self,
            _base: &str,
            filter: &str,
            _attributes: &[&str],
        ) -> Result<Vec<RawEntry>, ProtocolError> {
            let mut state = self.state.lock();
            state.searches.push(filter.to_string());
            if state.fail_searches {
                return Err(ProtocolError("server busy".to_string()));
            }

            let mail_of = |entry: &RawEntry| {
                entry
                    .attrs
                    .get("mail")
                    .and_then(|v| v.first())
                    .cloned()
                    .unwrap_or_default()
            };
            let matches: Vec<RawEntry> = if let Some(mail) = filter
                .strip_prefix("(mail=")
                .and_then(|f| f.strip_suffix(')'))
            {
                state
                    .people
                    .iter()
                    .filter(|e| crate::escape::escape_filter_value(&mail_of(e)) == mail)
                    .cloned()
                    .collect()
            } else if filter == EmployeeFilter::Managers.filter() {
                state
                    .people
                    .iter()
                    .filter(|e| e.attrs.contains_key("isManager"))
                    .cloned()
                    .collect()
            } else {
                state.people.clone()
            };
            Ok(matches)
        }

        async fn unbind(&mut self) -> Result<(), ProtocolError> {
            self.state.lock().unbinds += 1;
            Ok(())
        }
    }

    const ANON_DN: &str = "cn=anon,dc=example";
    const SESSION_EMAIL: &str = "me@example.com";

    fn entry(mail: &str, cn: &str) -> RawEntry {
        RawEntry::new(format!("mail={mail},o=com,dc=example"))
            .with_attr("mail", [mail])
            .with_attr("cn", [cn])
    }

    fn manager(mail: &str, cn: &str) -> RawEntry {
        entry(mail, cn).with_attr("isManager", ["TRUE"])
    }

    fn staff() -> Vec<RawEntry> {
        vec![
            entry(SESSION_EMAIL, "Me Myself"),
            manager("zed@example.com", "Zed Zulu"),
            manager("amy@example.com", "Amy Alpha"),
            entry("bob@example.com", "Bob Bravo"),
            RawEntry::new("cn=printer,dc=example").with_attr("isManager", ["TRUE"]),
        ]
    }

    fn config() -> LdapConfig {
        LdapConfig {
            base_dn: "o=com,dc=example".to_string(),
            anon_bind_dn: ANON_DN.to_string(),
            anon_password: SecretString::from("anon".to_string()),
            timeout_secs: 1,
            ..LdapConfig::default()
        }
    }

    fn client_with(directory: &FakeDirectory, config: LdapConfig) -> DirectoryClient {
        DirectoryClient::new(
            config,
            LdapCredentials::new(SESSION_EMAIL, SecretString::from("secret".to_string())),
            Arc::new(directory.clone()),
        )
    }

    fn client(directory: &FakeDirectory) -> DirectoryClient {
        client_with(directory, config())
    }

    #[tokio::test]
    async fn binds_anonymously_then_as_user() {
        let directory = FakeDirectory::with_people(staff());
        let client = client(&directory);
        assert_eq!(client.bind_state().await, BindState::Unbound);

        let person = client.find_by_email("bob@example.com").await.unwrap();
        assert_eq!(person.cn.as_deref(), Some("Bob Bravo"));
        assert_eq!(client.bind_state().await, BindState::UserBound);

        let state = directory.state.lock();
        assert_eq!(
            state.binds,
            vec![ANON_DN.to_string(), "mail=me@example.com,o=com,dc=example".to_string()]
        );
        assert_eq!(state.searches[0], "(mail=me@example.com)");
    }

    #[tokio::test]
    async fn user_binding_is_reused() {
        let directory = FakeDirectory::with_people(staff());
        let client = client(&directory);

        client.find_by_email("bob@example.com").await.unwrap();
        client.find_by_email("amy@example.com").await.unwrap();

        let state = directory.state.lock();
        assert_eq!(state.connects, 1);
        assert_eq!(state.binds.len(), 2);
    }

    #[tokio::test]
    async fn anonymous_bind_failure_is_a_connection_error() {
        let directory = FakeDirectory::with_people(staff());
        directory.state.lock().reject_anonymous = true;
        let client = client(&directory);

        let err = client.find_by_email("bob@example.com").await.unwrap_err();
        assert!(matches!(err, LdapError::ConnectionError(_)));
        assert_eq!(client.bind_state().await, BindState::Unbound);
        assert!(directory.state.lock().searches.is_empty());
    }

    #[tokio::test]
    async fn rejected_password_is_an_auth_error_and_starts_over() {
        let directory = FakeDirectory::with_people(staff());
        directory.state.lock().reject_password = true;
        let client = client(&directory);

        let err = client.find_by_email("bob@example.com").await.unwrap_err();
        match err {
            LdapError::AuthError { dn, reason } => {
                assert_eq!(dn, "mail=me@example.com,o=com,dc=example");
                assert!(reason.contains("invalidCredentials"));
            },
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(client.bind_state().await, BindState::Unbound);

        directory.state.lock().reject_password = false;
        client.find_by_email("bob@example.com").await.unwrap();
        assert_eq!(client.bind_state().await, BindState::UserBound);
        assert_eq!(directory.state.lock().connects, 2);
    }

    #[tokio::test]
    async fn session_email_must_match_exactly_one_entry() {
        let directory = FakeDirectory::with_people(vec![entry("bob@example.com", "Bob")]);
        let client = client(&directory);

        let err = client.find_by_email("bob@example.com").await.unwrap_err();
        assert!(matches!(
            err,
            LdapError::AmbiguousIdentity { matches: 0, .. }
        ));

        let directory = FakeDirectory::with_people(vec![
            entry(SESSION_EMAIL, "Me"),
            entry(SESSION_EMAIL, "Also Me"),
        ]);
        let client = self::client(&directory);
        let err = client.find_by_email("bob@example.com").await.unwrap_err();
        assert!(matches!(
            err,
            LdapError::AmbiguousIdentity { matches: 2, .. }
        ));
        assert_eq!(client.bind_state().await, BindState::Unbound);
    }

    #[tokio::test]
    async fn dn_template_skips_identity_search() {
        let directory = FakeDirectory::with_people(staff());
        let client = DirectoryClient::new(
            LdapConfig {
                user_dn_template: Some("mail={email},o=com,dc=corp".to_string()),
                ..config()
            },
            LdapCredentials::new(
                "first+last@example.com",
                SecretString::from("secret".to_string()),
            ),
            Arc::new(directory.clone()),
        );

        client.find_by_email("bob@example.com").await.unwrap();

        let state = directory.state.lock();
        assert_eq!(state.binds[1], r"mail=first\2blast@example.com,o=com,dc=corp");
        assert_eq!(state.searches, vec!["(mail=bob@example.com)".to_string()]);
    }

    #[tokio::test]
    async fn lookup_values_are_escaped() {
        let directory = FakeDirectory::with_people(staff());
        let client = client(&directory);

        let err = client.find_by_email("a*b").await.unwrap_err();
        assert!(matches!(err, LdapError::NotFound(ref email) if email == "a*b"));
        assert_eq!(directory.searches_for(r"(mail=a\2ab)"), 1);
        assert_eq!(directory.searches_for("(mail=a*b)"), 0);
    }

    #[tokio::test]
    async fn listing_is_sorted_by_common_name_and_skips_entries_without_mail() {
        let directory = FakeDirectory::with_people(staff());
        let client = client(&directory);

        let managers = client.list_by_role(EmployeeFilter::Managers).await.unwrap();
        let names: Vec<_> = managers.iter().filter_map(|p| p.cn.as_deref()).collect();
        assert_eq!(names, vec!["Amy Alpha", "Zed Zulu"]);

        let everyone = client.list_by_role(EmployeeFilter::All).await.unwrap();
        assert_eq!(everyone.len(), 4);
        assert_eq!(everyone[0].cn.as_deref(), Some("Amy Alpha"));
    }

    #[tokio::test]
    async fn listings_are_cached_per_filter() {
        let directory = FakeDirectory::with_people(staff());
        let client = client(&directory);
        let managers = EmployeeFilter::Managers.filter();

        let first = client.list_by_role(EmployeeFilter::Managers).await.unwrap();
        let second = client.list_by_role(EmployeeFilter::Managers).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(directory.searches_for(managers), 1);

        client.list_by_role(EmployeeFilter::All).await.unwrap();
        assert_eq!(directory.searches_for(EmployeeFilter::All.filter()), 1);
    }

    #[tokio::test]
    async fn lookups_by_email_always_search() {
        let directory = FakeDirectory::with_people(staff());
        let client = client(&directory);

        client.find_by_email("bob@example.com").await.unwrap();
        client.find_by_email("bob@example.com").await.unwrap();

        assert_eq!(directory.searches_for("(mail=bob@example.com)"), 2);
    }

    #[tokio::test]
    async fn cached_listing_expires() {
        let directory = FakeDirectory::with_people(staff());
        let client = client(&directory).with_cache_ttl(Duration::from_millis(100));
        let managers = EmployeeFilter::Managers.filter();

        client.list_by_role(EmployeeFilter::Managers).await.unwrap();
        client.list_by_role(EmployeeFilter::Managers).await.unwrap();
        assert_eq!(directory.searches_for(managers), 1);

        tokio::time::sleep(Duration::from_millis(250)).await;
        client.list_by_role(EmployeeFilter::Managers).await.unwrap();
        assert_eq!(directory.searches_for(managers), 2);
    }

    #[tokio::test]
    async fn zero_ttl_disables_the_cache() {
        let directory = FakeDirectory::with_people(staff());
        let client = client_with(
            &directory,
            LdapConfig {
                cache_ttl_secs: 0,
                ..config()
            },
        );

        client.list_by_role(EmployeeFilter::Managers).await.unwrap();
        client.list_by_role(EmployeeFilter::Managers).await.unwrap();
        assert_eq!(directory.searches_for(EmployeeFilter::Managers.filter()), 2);
    }

    #[tokio::test]
    async fn failed_search_is_reported_and_resets_the_session() {
        let directory = FakeDirectory::with_people(staff());
        let client = client(&directory);
        client.find_by_email("bob@example.com").await.unwrap();

        directory.state.lock().fail_searches = true;
        let err = client.list_by_role(EmployeeFilter::All).await.unwrap_err();
        assert!(matches!(err, LdapError::ConnectionError(ref r) if r.contains("server busy")));
        assert_eq!(client.bind_state().await, BindState::Unbound);
    }

    #[tokio::test]
    async fn stalled_connect_times_out() {
        let directory = FakeDirectory::with_people(staff());
        directory.state.lock().stall_connect = true;
        let client = client(&directory);

        let err = client.find_by_email("bob@example.com").await.unwrap_err();
        assert!(matches!(err, LdapError::ConnectionError(ref r) if r.contains("timed out")));
    }

    #[tokio::test]
    async fn close_unbinds() {
        let directory = FakeDirectory::with_people(staff());
        let client = client(&directory);
        client.find_by_email("bob@example.com").await.unwrap();

        client.close().await;
        assert_eq!(directory.state.lock().unbinds, 1);
        assert_eq!(client.bind_state().await, BindState::Unbound);

        client.close().await;
        assert_eq!(directory.state.lock().unbinds, 1);
    }
}
