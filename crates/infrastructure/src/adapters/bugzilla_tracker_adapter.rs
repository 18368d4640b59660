//! Tracker adapter - Implements TrackerPort using integration_bugzilla

use std::sync::Arc;

use application::ports::{TRACKER_BASE_URL_KEY, TrackerError, TrackerPort};
use async_trait::async_trait;
use domain::{BugId, BugPayload};
use integration_bugzilla::{
    BugzillaClient, BugzillaConfig, BugzillaError, HttpBugzillaClient, NewBug,
};
use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, instrument, warn};

use crate::config::BugDefaultsConfig;

/// Logged-in tracker session
struct TrackerSession {
    login: String,
    token: SecretString,
}

/// Adapter filing bugs through the Bugzilla REST API
pub struct BugzillaTrackerAdapter {
    client: Arc<dyn BugzillaClient>,
    defaults: BugDefaultsConfig,
    session: RwLock<Option<TrackerSession>>,
}

impl std::fmt::Debug for BugzillaTrackerAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BugzillaTrackerAdapter")
            .field("base_url", &self.client.base_url())
            .field("logged_in_as", &self.login_name())
            .finish_non_exhaustive()
    }
}

impl BugzillaTrackerAdapter {
    /// Create an adapter around any Bugzilla client
    pub fn new(client: Arc<dyn BugzillaClient>, defaults: BugDefaultsConfig) -> Self {
        Self {
            client,
            defaults,
            session: RwLock::new(None),
        }
    }

    /// Create an adapter with an HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn from_config(
        config: &BugzillaConfig,
        defaults: BugDefaultsConfig,
    ) -> Result<Self, TrackerError> {
        let client = HttpBugzillaClient::new(config.clone()).map_err(Self::map_error)?;
        Ok(Self::new(Arc::new(client), defaults))
    }

    /// Log in and keep the session token
    #[instrument(skip(self, password))]
    pub async fn login(&self, login: &str, password: &SecretString) -> Result<(), TrackerError> {
        let session = self
            .client
            .login(login, password.expose_secret())
            .await
            .map_err(Self::map_error)?;

        info!(user_id = session.id, "Tracker session started");
        *self.session.write() = Some(TrackerSession {
            login: login.to_string(),
            token: SecretString::from(session.token),
        });
        Ok(())
    }

    /// Resume a session from an existing token
    pub fn resume(&self, login: &str, token: SecretString) {
        *self.session.write() = Some(TrackerSession {
            login: login.to_string(),
            token,
        });
    }

    /// Invalidate the token and forget the session
    pub async fn logout(&self) {
        let session = self.session.write().take();
        let Some(session) = session else {
            return;
        };
        if let Err(e) = self.client.logout(session.token.expose_secret()).await {
            warn!(error = %e, "Tracker logout failed");
        }
    }

    /// Login of the current session
    pub fn login_name(&self) -> Option<String> {
        self.session.read().as_ref().map(|s| s.login.clone())
    }

    /// Token of the current session, for resuming it later
    pub fn session_token(&self) -> Option<SecretString> {
        self.session.read().as_ref().map(|s| s.token.clone())
    }

    fn credentials(&self) -> Option<(String, String)> {
        self.session
            .read()
            .as_ref()
            .map(|s| (s.login.clone(), s.token.expose_secret().to_string()))
    }

    /// Map integration error to port error
    fn map_error(err: BugzillaError) -> TrackerError {
        match err {
            BugzillaError::AuthenticationRequired(_) => TrackerError::AuthenticationRequired,
            BugzillaError::Timeout => TrackerError::Timeout,
            BugzillaError::ConnectionFailed(e) => TrackerError::Unavailable(e),
            BugzillaError::Api { code, message } => TrackerError::Rejected {
                code: Some(code),
                message,
            },
            err @ (BugzillaError::Http { .. } | BugzillaError::ParseError(_)) => {
                TrackerError::Rejected {
                    code: None,
                    message: err.to_string(),
                }
            },
        }
    }

    fn to_new_bug(&self, payload: &BugPayload) -> NewBug {
        let defaults = self.defaults.for_type(payload.bug_type);
        NewBug {
            product: defaults.product,
            component: defaults.component,
            version: defaults.version,
            summary: payload.summary.clone(),
            description: payload.description.clone(),
            cc: payload.cc.clone(),
            groups: payload.groups.iter().cloned().collect(),
            op_sys: defaults.op_sys,
            rep_platform: defaults.platform,
        }
    }
}

#[async_trait]
impl TrackerPort for BugzillaTrackerAdapter {
    async fn authenticated(&self) -> bool {
        match self.session_status().await {
            Ok(valid) => valid,
            Err(e) => {
                warn!(error = %e, "Tracker session check failed");
                false
            },
        }
    }

    async fn session_status(&self) -> Result<bool, TrackerError> {
        let Some((login, token)) = self.credentials() else {
            debug!("No tracker session");
            return Ok(false);
        };

        self.client
            .valid_login(&login, &token)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self, payload), fields(bug_type = %payload.bug_type))]
    async fn submit(&self, payload: &BugPayload) -> Result<BugId, TrackerError> {
        let (_, token) = self
            .credentials()
            .ok_or(TrackerError::AuthenticationRequired)?;

        let id = self
            .client
            .create_bug(&token, &self.to_new_bug(payload))
            .await
            .map_err(Self::map_error)?;

        BugId::new(id).map_err(|e| TrackerError::Rejected {
            code: None,
            message: e.to_string(),
        })
    }

    fn config(&self, key: &str) -> Option<String> {
        match key {
            TRACKER_BASE_URL_KEY => Some(self.client.base_url().to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use domain::BugType;
    use integration_bugzilla::LoginSession;
    use parking_lot::Mutex;

    use super::*;
    use crate::config::BugDefaults;

    #[derive(Default)]
    struct FakeBugzilla {
        created: Mutex<Vec<(String, NewBug)>>,
        logouts: Mutex<Vec<String>>,
        expired: bool,
        unreachable: bool,
        next_id: u64,
    }

    #[async_trait]
    impl BugzillaClient for FakeBugzilla {
        async fn login(&self, login: &str, password: &str) -> Result<LoginSession, BugzillaError> {
            if password == "secret" {
                Ok(LoginSession {
                    id: 7,
                    token: format!("7-{login}"),
                })
            } else {
                Err(BugzillaError::AuthenticationRequired(
                    "The username or password you entered is not valid.".to_string(),
                ))
            }
        }

        async fn valid_login(&self, _login: &str, _token: &str) -> Result<bool, BugzillaError> {
            if self.unreachable {
                return Err(BugzillaError::Timeout);
            }
            Ok(!self.expired)
        }

        async fn logout(&self, token: &str) -> Result<(), BugzillaError> {
            self.logouts.lock().push(token.to_string());
            Ok(())
        }

        async fn create_bug(&self, token: &str, bug: &NewBug) -> Result<u64, BugzillaError> {
            if self.expired {
                return Err(BugzillaError::AuthenticationRequired("expired".to_string()));
            }
            self.created.lock().push((token.to_string(), bug.clone()));
            Ok(self.next_id)
        }

        fn base_url(&self) -> &str {
            "https://bugzilla.example.com"
        }
    }

    fn payload() -> BugPayload {
        let mut payload = BugPayload::new(BugType::HardwareRequest, "Hardware request");
        payload.summary = "Hardware Request - Jane Doe (2024-01-15 - Indefinite)".to_string();
        payload.description = "Name: Jane Doe".to_string();
        payload.add_cc("boss@example.com");
        payload.add_group("hr");
        payload
    }

    fn adapter(fake: FakeBugzilla) -> (Arc<FakeBugzilla>, BugzillaTrackerAdapter) {
        let fake = Arc::new(fake);
        let mut defaults = BugDefaultsConfig::default();
        defaults.insert(
            BugType::HardwareRequest,
            BugDefaults {
                product: "mozilla.org".to_string(),
                component: "Server Operations: Desktop Issues".to_string(),
                ..BugDefaults::default()
            },
        );
        let adapter = BugzillaTrackerAdapter::new(Arc::clone(&fake) as Arc<dyn BugzillaClient>, defaults);
        (fake, adapter)
    }

    fn password(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[tokio::test]
    async fn not_authenticated_without_login() {
        let (_, adapter) = adapter(FakeBugzilla::default());
        assert!(!adapter.authenticated().await);
        assert!(matches!(
            adapter.submit(&payload()).await,
            Err(TrackerError::AuthenticationRequired)
        ));
    }

    #[tokio::test]
    async fn login_then_submit_uses_token_and_defaults() {
        let (fake, adapter) = adapter(FakeBugzilla {
            next_id: 1234,
            ..FakeBugzilla::default()
        });
        adapter.login("hr@example.com", &password("secret")).await.unwrap();
        assert!(adapter.authenticated().await);
        assert_eq!(adapter.login_name().as_deref(), Some("hr@example.com"));
        assert_eq!(
            adapter.session_token().unwrap().expose_secret(),
            "7-hr@example.com"
        );

        let id = adapter.submit(&payload()).await.unwrap();
        assert_eq!(id.get(), 1234);

        let created = fake.created.lock();
        let (token, bug) = &created[0];
        assert_eq!(token, "7-hr@example.com");
        assert_eq!(bug.product, "mozilla.org");
        assert_eq!(bug.component, "Server Operations: Desktop Issues");
        assert_eq!(bug.op_sys, "All");
        assert_eq!(bug.cc, vec!["boss@example.com".to_string()]);
        assert_eq!(bug.groups, vec!["hr".to_string()]);
    }

    #[tokio::test]
    async fn bad_password_is_authentication_required() {
        let (_, adapter) = adapter(FakeBugzilla::default());
        let err = adapter.login("hr@example.com", &password("wrong")).await.unwrap_err();
        assert!(matches!(err, TrackerError::AuthenticationRequired));
        assert!(adapter.login_name().is_none());
    }

    #[tokio::test]
    async fn expired_session_is_reported() {
        let (_, adapter) = adapter(FakeBugzilla {
            expired: true,
            ..FakeBugzilla::default()
        });
        adapter.resume("hr@example.com", password("7-old"));
        assert!(!adapter.authenticated().await);
        assert!(matches!(
            adapter.submit(&payload()).await,
            Err(TrackerError::AuthenticationRequired)
        ));
    }

    #[tokio::test]
    async fn unreachable_tracker_is_not_an_invalid_session() {
        let (_, adapter) = adapter(FakeBugzilla {
            unreachable: true,
            ..FakeBugzilla::default()
        });
        adapter.resume("hr@example.com", password("7-abc"));

        assert!(matches!(
            adapter.session_status().await,
            Err(TrackerError::Timeout)
        ));
        assert!(!adapter.authenticated().await);
    }

    #[tokio::test]
    async fn no_session_is_reported_without_asking_the_tracker() {
        let (_, adapter) = adapter(FakeBugzilla {
            unreachable: true,
            ..FakeBugzilla::default()
        });
        assert!(matches!(adapter.session_status().await, Ok(false)));
    }

    #[tokio::test]
    async fn zero_id_is_rejected() {
        let (_, adapter) = adapter(FakeBugzilla::default());
        adapter.resume("hr@example.com", password("7-abc"));
        assert!(matches!(
            adapter.submit(&payload()).await,
            Err(TrackerError::Rejected { code: None, .. })
        ));
    }

    #[tokio::test]
    async fn logout_invalidates_token_once() {
        let (fake, adapter) = adapter(FakeBugzilla::default());
        adapter.login("hr@example.com", &password("secret")).await.unwrap();

        adapter.logout().await;
        adapter.logout().await;

        assert_eq!(*fake.logouts.lock(), vec!["7-hr@example.com".to_string()]);
        assert!(!adapter.authenticated().await);
    }

    #[test]
    fn base_url_is_exposed_under_its_key() {
        let (_, adapter) = adapter(FakeBugzilla::default());
        assert_eq!(
            adapter.config(TRACKER_BASE_URL_KEY).as_deref(),
            Some("https://bugzilla.example.com")
        );
        assert!(adapter.config("password").is_none());
    }

    #[test]
    fn error_mapping() {
        assert!(matches!(
            BugzillaTrackerAdapter::map_error(BugzillaError::Timeout),
            TrackerError::Timeout
        ));
        assert!(matches!(
            BugzillaTrackerAdapter::map_error(BugzillaError::Api {
                code: 51,
                message: "no such component".to_string()
            }),
            TrackerError::Rejected { code: Some(51), .. }
        ));
        assert!(matches!(
            BugzillaTrackerAdapter::map_error(BugzillaError::ConnectionFailed("refused".into())),
            TrackerError::Unavailable(_)
        ));
    }
}
