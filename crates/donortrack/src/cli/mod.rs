//! Command-line interface for donortrack.
//!
//! This module defines the argument structure of the `donortrack` binary,
//! the text rendering it prints and the interactive browse loop.

pub mod browse;
mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use browse::run_browse;
pub use commands::{
    ConfigCommand, DonationCommand, DonationFieldArgs, DonorCommand, DonorFieldArgs,
    LettersCommand, OrgCommand, OrgFieldArgs, SearchCommand, StatusCommand,
};

use crate::logging::Verbosity;

/// donortrack - Keep track of donors and donations
///
/// Records donors and their donations for a small nonprofit and writes
/// year-end thank-you letters.
#[derive(Debug, Parser)]
#[command(name = "donortrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Use this database file instead of the configured one
    #[arg(long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add, edit, delete or show donors
    #[command(subcommand)]
    Donor(DonorCommand),

    /// Add, edit, delete or list donations
    #[command(subcommand)]
    Donation(DonationCommand),

    /// Search donors
    Search(SearchCommand),

    /// View or set the organization details
    #[command(subcommand)]
    Org(OrgCommand),

    /// Write year-end thank-you letters
    Letters(LettersCommand),

    /// Step through donors interactively
    Browse,

    /// Show database status
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).unwrap()
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "donortrack");
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["donortrack", "status"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["donortrack", "-v", "status"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["donortrack", "-vv", "status"]).verbosity(), Verbosity::Trace);
        assert_eq!(parse(&["donortrack", "-q", "status"]).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_parse_global_paths() {
        let cli = parse(&[
            "donortrack",
            "status",
            "--database",
            "/tmp/d.db",
            "-c",
            "/custom/config.toml",
        ]);
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/d.db")));
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_donor_add() {
        let cli = parse(&[
            "donortrack",
            "donor",
            "add",
            "--first-name",
            "Jane",
            "--email",
            "jane@example.com",
        ]);
        let Command::Donor(DonorCommand::Add(fields)) = cli.command else {
            panic!("expected donor add");
        };
        assert_eq!(fields.first_name.as_deref(), Some("Jane"));
        assert_eq!(fields.email.as_deref(), Some("jane@example.com"));
        assert!(fields.phone.is_none());
    }

    #[test]
    fn test_parse_donor_delete_requires_id() {
        assert!(Cli::try_parse_from(["donortrack", "donor", "delete"]).is_err());

        let cli = parse(&["donortrack", "donor", "delete", "7", "--yes"]);
        assert!(matches!(
            cli.command,
            Command::Donor(DonorCommand::Delete { id: 7, yes: true })
        ));
    }

    #[test]
    fn test_parse_donation_add() {
        let cli = parse(&[
            "donortrack",
            "donation",
            "add",
            "3",
            "--amount",
            "150.50",
            "--method",
            "check",
        ]);
        let Command::Donation(DonationCommand::Add { donor_id, fields }) = cli.command else {
            panic!("expected donation add");
        };
        assert_eq!(donor_id, 3);
        assert_eq!(fields.amount.as_deref(), Some("150.50"));
        assert_eq!(fields.payment_method.as_deref(), Some("check"));
        assert!(fields.date.is_none());
    }

    #[test]
    fn test_parse_search() {
        let cli = parse(&["donortrack", "search", "doe", "--json"]);
        let Command::Search(search) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(search.term.as_deref(), Some("doe"));
        assert!(search.json);
        assert!(!search.all);

        let cli = parse(&["donortrack", "search", "--all"]);
        assert!(matches!(cli.command, Command::Search(SearchCommand { term: None, all: true, .. })));
    }

    #[test]
    fn test_parse_org_set() {
        let cli = parse(&["donortrack", "org", "set", "--name", "Helping Hands"]);
        let Command::Org(OrgCommand::Set(fields)) = cli.command else {
            panic!("expected org set");
        };
        assert_eq!(fields.name.as_deref(), Some("Helping Hands"));
    }

    #[test]
    fn test_parse_letters() {
        let cli = parse(&["donortrack", "letters", "2024"]);
        assert!(matches!(
            cli.command,
            Command::Letters(LettersCommand { year: Some(2024), output_dir: None })
        ));

        let cli = parse(&["donortrack", "letters"]);
        assert!(matches!(cli.command, Command::Letters(LettersCommand { year: None, .. })));
    }

    #[test]
    fn test_parse_browse_and_config() {
        assert!(matches!(parse(&["donortrack", "browse"]).command, Command::Browse));
        assert!(matches!(
            parse(&["donortrack", "config", "path"]).command,
            Command::Config(ConfigCommand::Path)
        ));
    }
}
