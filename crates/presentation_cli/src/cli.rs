//! Command-line definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use domain::BugType;

/// Worker-management bug filing
#[derive(Parser)]
#[command(name = "workermgmt-cli")]
#[command(author, version, about = "File HR intake forms as Bugzilla bugs", long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, global = true, env = "WORKERMGMT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// File one bug per requested type from a submitted form
    ///
    /// Example: workermgmt-cli file --form hire.json -t hardware-request -t new-hire-setup
    File {
        /// JSON object with the submitted form fields
        #[arg(short, long)]
        form: PathBuf,

        /// Bug types to file, in order
        #[arg(short = 't', long = "bug-type", required = true, num_args = 1..)]
        bug_types: Vec<BugType>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        tracker: TrackerLogin,

        #[command(flatten)]
        directory: DirectoryLogin,
    },

    /// Check Bugzilla credentials and print a session token
    Login {
        #[command(flatten)]
        tracker: TrackerLogin,
    },

    /// Invalidate a Bugzilla session token
    Logout {
        /// Bugzilla login
        #[arg(long, env = "WORKERMGMT_BZ_LOGIN")]
        bz_login: String,

        /// Token returned by `login`
        #[arg(long, env = "WORKERMGMT_BZ_TOKEN", hide_env_values = true)]
        bz_token: String,
    },

    /// Query the employee directory
    Directory {
        #[command(flatten)]
        directory: DirectoryLogin,

        #[command(subcommand)]
        command: DirectoryCommands,
    },
}

#[derive(Subcommand)]
pub enum DirectoryCommands {
    /// Look up one person by mail address
    Lookup {
        /// Mail address
        email: String,
    },

    /// List employees, sorted by name
    List {
        /// Only people who manage others
        #[arg(long)]
        managers: bool,
    },
}

/// Bugzilla credentials; a token resumes an existing session
#[derive(Args)]
pub struct TrackerLogin {
    /// Bugzilla login
    #[arg(long, env = "WORKERMGMT_BZ_LOGIN")]
    pub bz_login: String,

    /// Bugzilla password
    #[arg(long, env = "WORKERMGMT_BZ_PASSWORD", hide_env_values = true)]
    pub bz_password: Option<String>,

    /// Existing session token
    #[arg(
        long,
        env = "WORKERMGMT_BZ_TOKEN",
        hide_env_values = true,
        conflicts_with = "bz_password"
    )]
    pub bz_token: Option<String>,
}

/// Directory credentials of the session user
#[derive(Args)]
pub struct DirectoryLogin {
    /// Directory login (mail address)
    #[arg(long, env = "WORKERMGMT_LDAP_USER")]
    pub ldap_user: String,

    /// Directory password
    #[arg(long, env = "WORKERMGMT_LDAP_PASSWORD", hide_env_values = true)]
    pub ldap_password: String,
}

/// Determine log filter level from verbosity count
pub const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
