//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::config::Config;

/// Arguments for `resolviq serve`.
#[derive(Debug, Clone, Default, Args)]
pub struct ServeCommand {
    /// Interface to listen on (overrides config)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,
}

impl ServeCommand {
    /// Overlay the command-line overrides onto `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

/// Configuration management commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
