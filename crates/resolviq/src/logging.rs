//! Tracing setup for the `resolviq` binary.
//!
//! Two sinks share one filter: a console layer on stdout and, when
//! `[logging] file = true`, a daily-rotated file under `[logging] dir`. The file writer runs on a background thread; its
//! [`WorkerGuard`] must stay alive until shutdown or buffered lines are lost.

use std::fs;

use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::Result;

/// Prefix of rotated log file names, e.g. `resolviq.2026-10-19.log`.
pub const LOG_FILE_PREFIX: &str = "resolviq";

const LOG_FILE_SUFFIX: &str = "log";

/// How much the console and the log file receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Info and above.
    #[default]
    Normal,
    /// Debug and above.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// The most detailed level let through.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Raise `Normal` to `Verbose` when the configuration asks for debug
    /// output. Explicit `-q` or `-vv` are left alone.
    #[must_use]
    pub fn with_debug(self, debug: bool) -> Self {
        match self {
            Self::Normal if debug => Self::Verbose,
            other => other,
        }
    }

    fn directives(self) -> String {
        let level = self.level();
        // Request spans from tower-http follow the same level as the crate.
        format!("resolviq={level},tower_http={level}")
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` replaces the filter derived from `verbosity`. Returns the file
/// writer's guard when file output is on; hold it for the life of the
/// process. If a subscriber is already installed this is a no-op apart from
/// opening the log directory.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the rolling
/// appender cannot be opened.
///
/// # Examples
///
/// ```no_run
/// use resolviq::{config::LoggingConfig, init_logging, logging::Verbosity};
///
/// let _guard = init_logging(Verbosity::Verbose, &LoggingConfig::default())?;
/// # Ok::<(), resolviq::Error>(())
/// ```
pub fn init_logging(verbosity: Verbosity, config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directives()));

    let (file_writer, guard) = match file_writer(config)? {
        Some((writer, guard)) => (Some(writer), Some(guard)),
        None => (None, None),
    };

    let console = fmt::layer().with_target(true);
    let file = file_writer.map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
    });

    // An existing subscriber (tests, embedding) wins.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init();

    Ok(guard)
}

/// Open the rolling log file writer, or `None` when file output is off.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the appender
/// cannot be opened.
pub fn file_writer(config: &LoggingConfig) -> Result<Option<(NonBlocking, WorkerGuard)>> {
    if !config.file {
        return Ok(None);
    }

    fs::create_dir_all(&config.dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(config.max_files)
        .build(&config.dir)?;

    Ok(Some(tracing_appender::non_blocking(appender)))
}

/// Initialize logging for tests: warnings and up, captured by the harness.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
