//! Bug payload builder
//!
//! Maps validated form input onto a [`BugPayload`] for one [`BugType`].
//! Required fields are checked up front and people referenced by the form
//! (manager, buddy) are resolved through the directory unless the form
//! already carries their name and tracker address.

mod templates;

use std::{fmt, sync::Arc};

use domain::{BugPayload, BugType, EmailAddress, FormInput};
use tracing::{debug, instrument, warn};

use self::templates::{TemplateContext, template_for};
use crate::{error::ApplicationError, ports::DirectoryPort};

/// A person referenced by a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonRole {
    /// The worker's manager (`manager` field)
    Manager,
    /// The worker's onboarding buddy (`buddy` field)
    Buddy,
}

impl PersonRole {
    /// Form field holding the person's directory mail address
    pub const fn email_field(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Buddy => "buddy",
        }
    }

    /// Form field that may carry the person's display name
    pub const fn name_field(self) -> &'static str {
        match self {
            Self::Manager => "manager_name",
            Self::Buddy => "buddy_name",
        }
    }

    /// Form field that may carry the person's tracker address
    pub const fn bugzilla_email_field(self) -> &'static str {
        match self {
            Self::Manager => "manager_bz_email",
            Self::Buddy => "buddy_bz_email",
        }
    }
}

/// A resolved person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub email: String,
    pub name: String,
    pub bugzilla_email: String,
}

/// Builder settings
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Domain of company mail accounts (`{username}@{mail_domain}`)
    pub mail_domain: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            mail_domain: "example.com".to_string(),
        }
    }
}

/// Builds bug payloads from form input
pub struct BugPayloadBuilder {
    directory: Arc<dyn DirectoryPort>,
    config: BuilderConfig,
}

impl fmt::Debug for BugPayloadBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BugPayloadBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BugPayloadBuilder {
    /// Create a builder that resolves people through `directory`
    pub fn new(directory: Arc<dyn DirectoryPort>, config: BuilderConfig) -> Self {
        Self { directory, config }
    }

    /// Human-readable name of a bug type, used in user messages
    pub fn label(bug_type: BugType) -> &'static str {
        template_for(bug_type).label
    }

    /// Build the payload for `bug_type` from `form`
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::Domain`] with a missing field when a required
    ///   field is absent or blank
    /// - [`ApplicationError::MissingInput`] when a referenced person is not an
    ///   address or cannot be found in the directory
    /// - [`ApplicationError::Directory`] when the directory itself fails
    #[instrument(skip(self, form), fields(fields = form.len()))]
    pub async fn build(
        &self,
        bug_type: BugType,
        form: &FormInput,
    ) -> Result<BugPayload, ApplicationError> {
        let template = template_for(bug_type);

        for field in template.required {
            form.required(field)?;
        }

        let mut manager = None;
        let mut buddy = None;
        for &role in template.people {
            let required = template.required.contains(&role.email_field());
            let person = self.resolve_person(role, form, required).await?;
            match role {
                PersonRole::Manager => manager = person,
                PersonRole::Buddy => buddy = person,
            }
        }

        let ctx = TemplateContext {
            form,
            mail_domain: &self.config.mail_domain,
            manager: manager.as_ref(),
            buddy: buddy.as_ref(),
        };

        let mut payload = BugPayload::new(bug_type, template.label);
        (template.render)(&mut payload, &ctx);

        debug!(
            label = template.label,
            cc = payload.cc.len(),
            groups = payload.groups.len(),
            "Built bug payload"
        );
        Ok(payload)
    }

    /// Resolve the person referenced by `role`
    ///
    /// Returns `None` when an optional person was left blank. Name and tracker
    /// address submitted with the form take precedence over the directory.
    async fn resolve_person(
        &self,
        role: PersonRole,
        form: &FormInput,
        required: bool,
    ) -> Result<Option<Person>, ApplicationError> {
        let raw_email = form.optional(role.email_field()).trim();
        if raw_email.is_empty() {
            return Ok(None);
        }

        let submitted_name = form.optional(role.name_field()).trim();
        let submitted_bz = form.optional(role.bugzilla_email_field()).trim();
        if !submitted_name.is_empty() && !submitted_bz.is_empty() {
            return Ok(Some(Person {
                email: raw_email.to_string(),
                name: submitted_name.to_string(),
                bugzilla_email: submitted_bz.to_string(),
            }));
        }

        let email = EmailAddress::new(raw_email).map_err(|e| {
            ApplicationError::MissingInput(format!("{}: {e}", role.email_field()))
        })?;

        match self.directory.find_by_email(&email).await {
            Ok(record) => Ok(Some(Person {
                email: email.to_string(),
                name: if submitted_name.is_empty() {
                    record.display_name().to_string()
                } else {
                    submitted_name.to_string()
                },
                bugzilla_email: if submitted_bz.is_empty() {
                    record.bugzilla_email
                } else {
                    submitted_bz.to_string()
                },
            })),
            Err(e) if e.is_unresolved_person() && required => Err(
                ApplicationError::MissingInput(format!("{}: {e}", role.email_field())),
            ),
            Err(e) if e.is_unresolved_person() => {
                warn!(field = role.email_field(), error = %e, "Optional person not resolved, using submitted address");
                Ok(Some(Person {
                    email: email.to_string(),
                    name: submitted_name.to_string(),
                    bugzilla_email: if submitted_bz.is_empty() {
                        email.to_string()
                    } else {
                        submitted_bz.to_string()
                    },
                }))
            },
            Err(e) => Err(e.into()),
        }
    }
}
