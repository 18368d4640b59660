//! Filing service
//!
//! Files one bug per requested type, in request order, and turns every
//! outcome into exactly one user-visible message. Failures are classified
//! by [`FailureKind`]; only an authentication failure stops the batch.

use std::{fmt, sync::Arc};

use domain::{BugId, BugType, FailureKind, FilingResult, FormInput, Severity};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use super::bug_builder::BugPayloadBuilder;
use crate::{
    error::ApplicationError,
    ports::{NotificationPort, TRACKER_BASE_URL_KEY, TrackerPort, bug_link},
};

/// A batch hit a failure nobody knows how to handle
///
/// The batch still ran to completion; `results` holds one entry per
/// attempted bug type. `source` is the first unclassified error.
#[derive(Debug, Error)]
#[error("Unhandled failure while filing bugs: {source}")]
pub struct UnhandledFilingError {
    pub results: Vec<FilingResult>,
    #[source]
    pub source: ApplicationError,
}

/// Drives the build-and-submit workflow for a batch of bug types
pub struct FilingService {
    builder: BugPayloadBuilder,
    notifier: Arc<dyn NotificationPort>,
}

impl fmt::Debug for FilingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilingService")
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}

impl FilingService {
    /// Create a new filing service
    pub fn new(builder: BugPayloadBuilder, notifier: Arc<dyn NotificationPort>) -> Self {
        Self { builder, notifier }
    }

    /// File `bug_types` using `form` against the session `tracker`
    ///
    /// Returns one result per requested bug type in request order. When the
    /// session turns out to be unauthenticated the batch stops and the
    /// authentication failure is the last entry.
    ///
    /// # Errors
    ///
    /// Returns [`UnhandledFilingError`] (carrying all results) when at least
    /// one bug failed for an unclassified reason.
    #[instrument(skip(self, form, tracker), fields(requested = bug_types.len()))]
    pub async fn file(
        &self,
        bug_types: &[BugType],
        form: &FormInput,
        tracker: &dyn TrackerPort,
    ) -> Result<Vec<FilingResult>, UnhandledFilingError> {
        let mut results = Vec::with_capacity(bug_types.len());
        let mut unhandled = None;

        for &bug_type in bug_types {
            match self.file_one(bug_type, form, tracker).await {
                Ok(bug_id) => {
                    self.report_success(bug_type, bug_id, tracker);
                    results.push(FilingResult::filed(bug_type, bug_id));
                },
                Err(err) => {
                    let kind = err.failure_kind();
                    self.report_failure(bug_type, kind, &err);
                    results.push(FilingResult::failed(bug_type, kind, err.to_string()));

                    if kind.aborts_batch() {
                        warn!(
                            remaining = bug_types.len() - results.len(),
                            "Aborting batch, tracker session must be re-established"
                        );
                        break;
                    }
                    if kind == FailureKind::Unknown && unhandled.is_none() {
                        unhandled = Some(err);
                    }
                },
            }
        }

        match unhandled {
            Some(source) => Err(UnhandledFilingError { results, source }),
            None => Ok(results),
        }
    }

    async fn file_one(
        &self,
        bug_type: BugType,
        form: &FormInput,
        tracker: &dyn TrackerPort,
    ) -> Result<BugId, ApplicationError> {
        // an unreachable tracker is a tracker failure, not an expired session
        if !tracker.session_status().await? {
            return Err(ApplicationError::NotAuthenticated);
        }

        let payload = self.builder.build(bug_type, form).await?;
        let bug_id = tracker.submit(&payload).await?;

        info!(%bug_type, %bug_id, label = %payload.label, "Filed bug");
        Ok(bug_id)
    }

    fn report_success(&self, bug_type: BugType, bug_id: BugId, tracker: &dyn TrackerPort) {
        let label = BugPayloadBuilder::label(bug_type);
        let link = if let Some(base_url) = tracker.config(TRACKER_BASE_URL_KEY) {
            bug_link(&base_url, bug_id)
        } else {
            warn!("Tracker base URL not configured, linking relatively");
            format!("show_bug.cgi?id={bug_id}")
        };

        self.notifier.notify(
            &format!("{label} filed as bug {bug_id}: {link}"),
            Severity::Notice,
        );
    }

    fn report_failure(&self, bug_type: BugType, kind: FailureKind, err: &ApplicationError) {
        let label = BugPayloadBuilder::label(bug_type);

        let message = match kind {
            FailureKind::AuthenticationFailed => {
                warn!(%bug_type, error = %err, "Tracker authentication failed");
                "Authentication failed, need to re-login".to_string()
            },
            FailureKind::MissingInput => {
                error!(%bug_type, label, error = %err, "Missing required input");
                format!("Missing required input to build the \"{label}\" bug")
            },
            FailureKind::TrackerInteraction => {
                error!(%bug_type, label, error = %err, "Tracker rejected bug");
                format!("There was an error communicating with the tracker for bug \"{label}\": {err}")
            },
            FailureKind::Unknown => {
                error!(%bug_type, label, error = ?err, "Unknown failure when filing bug");
                format!("Unknown failure when filing the \"{label}\" bug")
            },
        };

        self.notifier.notify(&message, Severity::Error);
    }
}
