//! Worker-management CLI
//!
//! Files HR intake forms as Bugzilla bugs and queries the employee directory.

#![allow(clippy::print_stdout)]

mod cli;
mod form;

use std::sync::Arc;

use anyhow::Context;
use application::{
    BugPayloadBuilder, DirectoryPort, FilingService, NotificationPort, TrackerPort,
};
use clap::Parser;
use cli::{
    Cli, Commands, DirectoryCommands, DirectoryLogin, TrackerLogin, log_filter_from_verbosity,
};
use domain::{
    BugType, DirectoryRecord, EmailAddress, FailureKind, FilingResult, FormInput, RoleFilter,
    Severity,
};
use infrastructure::{
    AppConfig, BugzillaTrackerAdapter, LdapDirectoryAdapter, SessionMessages, init_telemetry,
};
use integration_ldap::LdapCredentials;
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config =
        AppConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;

    // -v overrides the configured filter; RUST_LOG still wins over both
    let telemetry = if cli.verbose > 0 {
        config
            .telemetry
            .clone()
            .with_filter(log_filter_from_verbosity(cli.verbose))
    } else {
        config.telemetry.clone()
    };
    init_telemetry(&telemetry)?;

    match cli.command {
        Commands::File {
            form: form_path,
            bug_types,
            json,
            tracker,
            directory,
        } => {
            let form = form::load_form(&form_path)
                .with_context(|| format!("Failed to load form {}", form_path.display()))?;
            file_bugs(&config, &bug_types, &form, &tracker, &directory, json).await
        },

        Commands::Login { tracker } => {
            let adapter = connect_tracker(&config, &tracker).await?;
            if !adapter.authenticated().await {
                anyhow::bail!("Bugzilla session is not valid, log in again");
            }
            println!("Logged in as {}", tracker.bz_login);
            if let Some(token) = adapter.session_token() {
                println!("Token: {}", token.expose_secret());
            }
            Ok(())
        },

        Commands::Logout { bz_login, bz_token } => {
            let adapter =
                BugzillaTrackerAdapter::from_config(&config.bugzilla, config.bug_defaults.clone())?;
            adapter.resume(&bz_login, SecretString::from(bz_token));
            adapter.logout().await;
            println!("Logged out");
            Ok(())
        },

        Commands::Directory { directory, command } => {
            let adapter = connect_directory(&config, &directory);
            let result = run_directory(&adapter, command).await;
            adapter.close().await;
            result
        },
    }
}

async fn file_bugs(
    config: &AppConfig,
    bug_types: &[BugType],
    form: &FormInput,
    tracker: &TrackerLogin,
    directory: &DirectoryLogin,
    json: bool,
) -> anyhow::Result<()> {
    let tracker_adapter = connect_tracker(config, tracker).await?;
    let directory_adapter = Arc::new(connect_directory(config, directory));
    let messages = Arc::new(SessionMessages::new());

    let service = FilingService::new(
        BugPayloadBuilder::new(
            Arc::clone(&directory_adapter) as Arc<dyn DirectoryPort>,
            config.builder_config(),
        ),
        Arc::clone(&messages) as Arc<dyn NotificationPort>,
    );

    let outcome = service.file(bug_types, form, &tracker_adapter).await;
    directory_adapter.close().await;
    // a resumed session belongs to the caller
    if tracker.bz_token.is_none() {
        tracker_adapter.logout().await;
    }

    let results = match &outcome {
        Ok(results) => results.as_slice(),
        Err(err) => err.results.as_slice(),
    };
    let worst = messages.highest_severity();
    render_filing(results, &messages, json)?;

    let filed = results.iter().filter(|r| r.bug_id().is_some()).count();
    let needs_login = results
        .iter()
        .any(|r| r.failure_kind() == Some(FailureKind::AuthenticationFailed));
    info!(requested = bug_types.len(), filed, "Filing finished");

    outcome?;
    if needs_login {
        anyhow::bail!("Bugzilla session is not valid, log in again");
    }
    if worst == Some(Severity::Error) {
        anyhow::bail!(
            "{} of {} bugs could not be filed",
            bug_types.len() - filed,
            bug_types.len()
        );
    }
    Ok(())
}

fn render_filing(
    results: &[FilingResult],
    messages: &SessionMessages,
    json: bool,
) -> anyhow::Result<()> {
    let messages = messages.drain();
    if json {
        let report = serde_json::json!({ "results": results, "messages": messages });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for message in messages {
            println!("[{}] {}", message.severity, message.text);
        }
    }
    Ok(())
}

async fn run_directory(
    adapter: &LdapDirectoryAdapter,
    command: DirectoryCommands,
) -> anyhow::Result<()> {
    match command {
        DirectoryCommands::Lookup { email } => {
            let email = EmailAddress::new(email)?;
            let record = adapter.find_by_email(&email).await?;
            print_record(&record);
        },
        DirectoryCommands::List { managers } => {
            let role = if managers {
                RoleFilter::ManagersOnly
            } else {
                RoleFilter::All
            };
            let records = adapter.list_by_role(role).await?;
            for record in &records {
                print_record(record);
            }
            println!("{} people", records.len());
        },
    }
    Ok(())
}

fn print_record(record: &DirectoryRecord) {
    println!(
        "{} <{}> bugzilla={} title={} type={}",
        record.display_name(),
        record.email,
        record.bugzilla_email,
        record.title.as_deref().unwrap_or("-"),
        record.employee_type.as_deref().unwrap_or("-"),
    );
}

async fn connect_tracker(
    config: &AppConfig,
    login: &TrackerLogin,
) -> anyhow::Result<BugzillaTrackerAdapter> {
    let adapter =
        BugzillaTrackerAdapter::from_config(&config.bugzilla, config.bug_defaults.clone())?;

    match (&login.bz_token, &login.bz_password) {
        (Some(token), _) => adapter.resume(&login.bz_login, SecretString::from(token.clone())),
        (None, Some(password)) => adapter
            .login(&login.bz_login, &SecretString::from(password.clone()))
            .await
            .context("Bugzilla login failed")?,
        (None, None) => anyhow::bail!("Either --bz-password or --bz-token is required"),
    }
    Ok(adapter)
}

fn connect_directory(config: &AppConfig, login: &DirectoryLogin) -> LdapDirectoryAdapter {
    LdapDirectoryAdapter::from_config(
        &config.directory,
        LdapCredentials::new(
            login.ldap_user.as_str(),
            SecretString::from(login.ldap_password.clone()),
        ),
    )
}
