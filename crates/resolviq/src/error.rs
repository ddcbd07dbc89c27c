//! Error types for resolviq.
//!
//! Session operations never fail: an unknown session or a rejected step is an
//! ordinary `None`/`false`. The errors here cover the ambient surface around
//! the core: configuration and the listener.

use std::net::SocketAddr;

use thiserror::Error;

/// The main error type for resolviq operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Server Errors ===
    /// The configured host/port pair does not form a socket address.
    #[error("invalid bind address '{address}'")]
    BindAddress {
        /// The address as it was assembled from configuration.
        address: String,
    },

    /// The HTTP listener could not be bound.
    #[error("failed to bind listener on {addr}: {source}")]
    Bind {
        /// Address the listener tried to bind.
        addr: SocketAddr,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Logging Errors ===
    /// The rolling log file could not be opened.
    #[error("failed to open log file: {0}")]
    LogFile(#[from] tracing_appender::rolling::InitError),

    // === I/O Errors ===
    /// File system or socket operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for resolviq operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error came from configuration loading or validation.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigLoad(_) | Self::ConfigValidation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation_display() {
        let err = Error::config_validation("port must be greater than 0");
        assert_eq!(
            err.to_string(),
            "invalid configuration: port must be greater than 0"
        );
        assert!(err.is_config_error());
    }

    #[test]
    fn test_io_error_is_not_config_error() {
        let err: Error = std::io::Error::other("socket closed").into();
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_bind_address_display() {
        let err = Error::BindAddress {
            address: "not a host:80".to_string(),
        };
        assert!(err.to_string().contains("not a host:80"));
    }

    #[test]
    fn test_bind_error_display() {
        let err = Error::Bind {
            addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use"),
        };
        let msg = err.to_string();
        assert!(msg.contains("127.0.0.1:5000"));
        assert!(msg.contains("address in use"));
    }

    #[test]
    fn test_log_file_error_from_appender() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let err = tracing_appender::rolling::RollingFileAppender::builder()
            .filename_prefix("resolviq")
            .build(tmp.path().join("under-a-file"))
            .unwrap_err();
        let err: Error = err.into();
        assert!(matches!(err, Error::LogFile(_)));
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_figment_error() {
        let err: Error = figment::Error::from("bad value".to_string()).into();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("bad value"));
    }
}
