//! Configuration management for resolviq.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "resolviq";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "RESOLVIQ_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `RESOLVIQ_`, nested keys joined
///    with `__`, e.g. `RESOLVIQ_SERVER__PORT`)
/// 2. TOML config file at `~/.config/resolviq/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Session cookie configuration.
    pub session: SessionConfig,
    /// Log file configuration.
    pub logging: LoggingConfig,
    /// Log at debug level unless `RUST_LOG` or CLI flags say otherwise.
    pub debug: bool,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to listen on.
    pub host: String,
    /// TCP port to listen on.
    pub port: u16,
}

/// Session cookie configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session identifier.
    pub cookie_name: String,
    /// How long the browser keeps the session cookie, in hours.
    pub lifetime_hours: u32,
}

/// Log file configuration.
///
/// Console output is always on. The file sink rotates daily and keeps at
/// most `max_files` files named `resolviq.<date>.log` under `dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to files under `dir`.
    pub file: bool,
    /// Directory for log files, relative to the working directory unless
    /// absolute.
    pub dir: PathBuf,
    /// Rotated files to keep before the oldest is deleted.
    pub max_files: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "resolviq_session".to_string(),
            lifetime_hours: 2,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: true,
            dir: PathBuf::from("logs"),
            max_files: 10,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing, or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let config: Config = Self::figment(config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::config_validation(
                "server.port must be greater than 0",
            ));
        }

        if self.session.lifetime_hours == 0 {
            return Err(Error::config_validation(
                "session.lifetime_hours must be greater than 0",
            ));
        }

        let name = &self.session.cookie_name;
        if name.is_empty()
            || name
                .chars()
                .any(|c| c.is_whitespace() || c.is_control() || matches!(c, ';' | '=' | ','))
        {
            return Err(Error::config_validation(format!(
                "invalid session.cookie_name: {name:?}"
            )));
        }

        if self.logging.file {
            if self.logging.dir.as_os_str().is_empty() {
                return Err(Error::config_validation(
                    "logging.dir must not be empty when logging.file is on",
                ));
            }
            if self.logging.max_files == 0 {
                return Err(Error::config_validation(
                    "logging.max_files must be greater than 0",
                ));
            }
        }

        self.bind_address().map(|_| ())
    }

    /// Resolve the listener address from `server.host` and `server.port`.
    ///
    /// # Errors
    ///
    /// Returns an error if `server.host` is not an IP address.
    pub fn bind_address(&self) -> Result<SocketAddr> {
        self.server
            .host
            .parse::<IpAddr>()
            .map(|ip| SocketAddr::new(ip, self.server.port))
            .map_err(|_| Error::BindAddress {
                address: format!("{}:{}", self.server.host, self.server.port),
            })
    }

    /// Get the session cookie lifetime as a Duration.
    #[must_use]
    pub fn session_lifetime(&self) -> Duration {
        Duration::from_secs(u64::from(self.session.lifetime_hours) * 60 * 60)
    }
}
