//! Report rendering.
//!
//! Both renderers are pure functions of a [`Session`](crate::record::Session)
//! snapshot and the instant the report is generated:
//!
//! - [`markdown::render`] produces the on-screen troubleshooting report.
//! - [`rca::render`] produces the fixed-width Root Cause Analysis document
//!   offered as a download.

pub mod markdown;
pub mod rca;

use std::fmt;

use chrono::{DateTime, TimeZone};

/// Suggested file name for a downloaded RCA document.
///
/// Spaces in the title become underscores; an empty title becomes `Report`.
#[must_use]
pub fn rca_filename<Tz>(title: &str, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let name = title.replace(' ', "_");
    let name = if name.is_empty() { "Report" } else { &name };
    format!("RCA_{name}_{}.txt", now.format("%Y%m%d_%H%M%S"))
}
