//! Command-line interface for resolviq.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, ServeCommand};

use crate::logging::Verbosity;

/// resolviq - Track server troubleshooting sessions
///
/// Serves a small web application that records the steps taken while
/// investigating an issue and turns them into Markdown and RCA reports.
#[derive(Debug, Parser)]
#[command(name = "resolviq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

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
    /// Run the web server
    Serve(ServeCommand),

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

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Serve(ServeCommand::default()),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "resolviq");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["resolviq", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Command::Serve(cmd) => {
                assert_eq!(cmd.port, Some(8080));
                assert!(cmd.host.is_none());
            }
            Command::Config(_) => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_serve_rejects_bad_port() {
        assert!(Cli::try_parse_from(["resolviq", "serve", "--port", "70000"]).is_err());
    }

    #[test]
    fn test_parse_config_show_json() {
        let cli = Cli::try_parse_from(["resolviq", "config", "show", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
    }

    #[test]
    fn test_parse_config_validate_file() {
        let cli =
            Cli::try_parse_from(["resolviq", "config", "validate", "--file", "/tmp/r.toml"])
                .unwrap();
        match cli.command {
            Command::Config(ConfigCommand::Validate { file }) => {
                assert_eq!(file, Some(PathBuf::from("/tmp/r.toml")));
            }
            _ => panic!("expected config validate"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["resolviq", "serve", "-vv", "-c", "alt.toml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
    }

    #[test]
    fn test_missing_subcommand_fails() {
        assert!(Cli::try_parse_from(["resolviq"]).is_err());
    }
}
