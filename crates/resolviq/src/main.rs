//! `resolviq` - troubleshooting session tracker
//!
//! Runs the web server or inspects its configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use resolviq::cli::{Cli, Command, ConfigCommand, ServeCommand};
use resolviq::{init_logging, server, Config, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(ref serve_cmd) => handle_serve(&cli, serve_cmd).await,
        Command::Config(ref config_cmd) => handle_config(&cli, config_cmd),
    }
}

async fn handle_serve(cli: &Cli, cmd: &ServeCommand) -> anyhow::Result<()> {
    let mut config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;
    cmd.apply(&mut config);
    config.validate().context("invalid server options")?;

    let _log_guard = init_logging(cli.verbosity().with_debug(config.debug), &config.logging)
        .context("failed to initialize logging")?;
    tracing::info!("ResolvIQ logging configured");
    tracing::debug!(?config, "configuration loaded");

    let store = Arc::new(SessionStore::new());
    server::serve(&config, store).await?;
    Ok(())
}

fn handle_config(cli: &Cli, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(cli.config.clone())?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print_config(&config);
            }
        }
        ConfigCommand::Path => {
            println!("{}", config_path(cli.config.clone()).display());
        }
        ConfigCommand::Validate { file } => {
            let path = config_path(file.clone().or_else(|| cli.config.clone()));
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path)).context("configuration is invalid")?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}

fn config_path(custom: Option<PathBuf>) -> PathBuf {
    custom.unwrap_or_else(Config::default_config_path)
}

fn print_config(config: &Config) {
    println!("Current Configuration");
    println!("=====================");
    println!();
    println!("[Server]");
    println!("  Host:               {}", config.server.host);
    println!("  Port:               {}", config.server.port);
    println!();
    println!("[Session]");
    println!("  Cookie name:        {}", config.session.cookie_name);
    println!("  Lifetime (hours):   {}", config.session.lifetime_hours);
    println!();
    println!("[Logging]");
    println!("  File output:        {}", config.logging.file);
    println!("  Directory:          {}", config.logging.dir.display());
    println!("  Max files:          {}", config.logging.max_files);
    println!();
    println!("Debug:                {}", config.debug);
}
