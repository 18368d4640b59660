//! Integration tests for CLI
//!
//! These tests verify argument parsing without running any commands.

#![allow(clippy::panic)] // Allow panic! in tests for clear failure messages

#[path = "../src/cli.rs"]
mod cli;

use clap::Parser;
use cli::{Cli, Commands, DirectoryCommands, log_filter_from_verbosity};
use domain::BugType;

const TRACKER: [&str; 4] = ["--bz-login", "hr@example.com", "--bz-password", "secret"];
const DIRECTORY: [&str; 4] = [
    "--ldap-user",
    "hr@example.com",
    "--ldap-password",
    "secret",
];

fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
    let mut argv = vec!["workermgmt-cli"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv)
}

fn file_args<'a>(extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec!["file", "--form", "hire.json"];
    args.extend_from_slice(extra);
    args.extend_from_slice(&TRACKER);
    args.extend_from_slice(&DIRECTORY);
    args
}

#[test]
fn cli_parses_file_command_in_request_order() {
    let cli = parse_args(&file_args(&["-t", "new-hire-setup", "hardware-request"])).unwrap();
    match cli.command {
        Commands::File {
            bug_types, json, ..
        } => {
            assert_eq!(
                bug_types,
                vec![BugType::NewHireSetup, BugType::HardwareRequest]
            );
            assert!(!json);
        },
        _ => panic!("Expected File command"),
    }
}

#[test]
fn cli_accepts_repeated_bug_type_flags() {
    let cli = parse_args(&file_args(&[
        "--bug-type",
        "email_setup",
        "--bug-type",
        "contractor-setup",
        "--json",
    ]))
    .unwrap();
    match cli.command {
        Commands::File {
            bug_types, json, ..
        } => {
            assert_eq!(bug_types, vec![BugType::EmailSetup, BugType::ContractorSetup]);
            assert!(json);
        },
        _ => panic!("Expected File command"),
    }
}

#[test]
fn cli_rejects_unknown_bug_type() {
    assert!(parse_args(&file_args(&["-t", "payroll"])).is_err());
}

#[test]
fn cli_file_requires_bug_type() {
    assert!(parse_args(&file_args(&[])).is_err());
}

#[test]
fn cli_token_conflicts_with_password() {
    let mut args = file_args(&["-t", "email-setup"]);
    args.extend_from_slice(&["--bz-token", "7-abc"]);
    assert!(parse_args(&args).is_err());
}

#[test]
fn cli_login_with_token() {
    let cli = parse_args(&["login", "--bz-login", "hr@example.com", "--bz-token", "7-abc"]).unwrap();
    match cli.command {
        Commands::Login { tracker } => {
            assert_eq!(tracker.bz_token.as_deref(), Some("7-abc"));
            assert!(tracker.bz_password.is_none());
        },
        _ => panic!("Expected Login command"),
    }
}

#[test]
fn cli_parses_directory_lookup() {
    let mut args = vec!["directory"];
    args.extend_from_slice(&DIRECTORY);
    args.extend_from_slice(&["lookup", "boss@example.com"]);
    let cli = parse_args(&args).unwrap();
    match cli.command {
        Commands::Directory {
            command: DirectoryCommands::Lookup { email },
            directory,
        } => {
            assert_eq!(email, "boss@example.com");
            assert_eq!(directory.ldap_user, "hr@example.com");
        },
        _ => panic!("Expected directory lookup"),
    }
}

#[test]
fn cli_parses_directory_list_managers() {
    let mut args = vec!["directory"];
    args.extend_from_slice(&DIRECTORY);
    args.extend_from_slice(&["list", "--managers"]);
    let cli = parse_args(&args).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Directory {
            command: DirectoryCommands::List { managers: true },
            ..
        }
    ));
}

#[test]
fn cli_global_flags_after_subcommand() {
    let mut args = vec!["directory"];
    args.extend_from_slice(&DIRECTORY);
    args.extend_from_slice(&["list", "-vv", "--config", "prod.toml"]);
    let cli = parse_args(&args).unwrap();
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config.unwrap().to_str(), Some("prod.toml"));
}

#[test]
fn cli_requires_subcommand() {
    assert!(parse_args(&[]).is_err());
}

#[test]
fn log_filter_levels() {
    assert_eq!(log_filter_from_verbosity(0), "warn");
    assert_eq!(log_filter_from_verbosity(1), "info");
    assert_eq!(log_filter_from_verbosity(2), "debug");
    assert_eq!(log_filter_from_verbosity(5), "trace");
}
