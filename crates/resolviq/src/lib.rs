//! `resolviq` - track server troubleshooting sessions and turn them into reports
//!
//! A session records the issue under investigation, each diagnostic step
//! taken, and the final resolution. Sessions live in memory inside a
//! [`SessionStore`] and can be rendered as a Markdown troubleshooting report
//! or a plain-text Root Cause Analysis document. The [`server`] module puts
//! the store behind a cookie-keyed HTTP interface.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod report;
pub mod server;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{IssueInfo, Resolution, Session, Step};
pub use store::SessionStore;
