//! Session cookie handling.
//!
//! The cookie carries nothing but the session identifier. The store never
//! sees it; handlers read the id out of the request and write it back on the
//! response.

use std::time::Duration;

use axum::http::{header, HeaderMap};

use crate::config::Config;

/// Reads and writes the session identifier cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    name: String,
    max_age: Duration,
}

impl SessionCookie {
    /// Create a cookie codec for `name` that browsers keep for `max_age`.
    #[must_use]
    pub fn new(name: impl Into<String>, max_age: Duration) -> Self {
        Self {
            name: name.into(),
            max_age,
        }
    }

    /// Build from the `[session]` configuration section.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.session.cookie_name.clone(), config.session_lifetime())
    }

    /// The cookie name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extract the session id from the request's `Cookie` headers.
    ///
    /// Empty values are treated as absent.
    #[must_use]
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == self.name && !value.is_empty())
            .map(|(_, value)| value.to_string())
    }

    /// `Set-Cookie` value that stores `session_id`.
    #[must_use]
    pub fn set(&self, session_id: &str) -> String {
        format!(
            "{}={session_id}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            self.name,
            self.max_age.as_secs()
        )
    }

    /// `Set-Cookie` value that makes the browser drop the cookie.
    #[must_use]
    pub fn clear(&self) -> String {
        format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", self.name)
    }
}
