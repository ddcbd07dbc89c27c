//! Plain-text Root Cause Analysis document.
//!
//! Fixed-width banners separate the sections. The executive summary and the
//! problem statement are always present; every other section appears only
//! when it has content.

use std::fmt;

use chrono::{DateTime, TimeZone};

use crate::record::Session;

/// Step outputs longer than this many characters are cut in the timeline.
pub const OUTPUT_LIMIT: usize = 500;

/// Appended to a cut step output.
pub const TRUNCATION_MARKER: &str = "... [TRUNCATED]";

/// Name stamped in the closing banner.
const PRODUCT_NAME: &str = "ResolvIQ";

const BANNER_WIDTH: usize = 80;
const RULE: usize = 20;
const WIDE_RULE: usize = 25;

/// Render `session` as an RCA document generated at `now`.
#[must_use]
pub fn render<Tz>(session: &Session, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    RcaDocument {
        session,
        generated: now.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
    .to_string()
}

/// Cut `output` to [`OUTPUT_LIMIT`] characters, marking the cut.
///
/// Counts Unicode scalar values, so multi-byte text is never split inside a
/// character.
#[must_use]
pub fn truncate_output(output: &str) -> String {
    match output.char_indices().nth(OUTPUT_LIMIT) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &output[..cut]),
        None => output.to_string(),
    }
}

struct RcaDocument<'a> {
    session: &'a Session,
    generated: String,
}

fn banner(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "=".repeat(BANNER_WIDTH))
}

fn section(f: &mut fmt::Formatter<'_>, label: &str, rule: usize) -> fmt::Result {
    writeln!(f, "{label}")?;
    writeln!(f, "{}", "-".repeat(rule))
}

fn text_section(f: &mut fmt::Formatter<'_>, label: &str, rule: usize, body: &str) -> fmt::Result {
    if body.is_empty() {
        return Ok(());
    }
    section(f, label, rule)?;
    write!(f, "{body}\n\n")
}

impl RcaDocument<'_> {
    fn write_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let issue = &self.session.issue_info;

        section(f, "EXECUTIVE SUMMARY", RULE)?;
        writeln!(f, "Issue Title: {}", issue.display_title())?;
        writeln!(f, "Server/Environment: {}", issue.server)?;
        writeln!(f, "Priority Level: {}", issue.priority)?;
        writeln!(f, "Report Generated: {}", self.generated)?;
        write!(
            f,
            "Investigation Steps: {}\n\n",
            self.session.steps.len()
        )?;

        section(f, "PROBLEM STATEMENT", RULE)?;
        write!(f, "Initial Symptoms: {}\n\n", issue.symptoms)
    }

    fn write_timeline(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.session.steps.is_empty() {
            return Ok(());
        }

        section(f, "INVESTIGATION TIMELINE", RULE)?;
        // Numbered by position; the step's own id can repeat after removals.
        for (position, step) in self.session.steps.iter().enumerate() {
            writeln!(f, "Step {}:", position + 1)?;

            if !step.command.is_empty() {
                writeln!(f, "  Command/Action: {}", step.command)?;
            }
            if !step.output.is_empty() {
                writeln!(f, "  Output/Result: {}", truncate_output(&step.output))?;
            }
            if !step.analysis.is_empty() {
                writeln!(f, "  Analysis: {}", step.analysis)?;
            }

            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for RcaDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resolution = &self.session.resolution;

        banner(f)?;
        writeln!(f, "ROOT CAUSE ANALYSIS (RCA) REPORT")?;
        banner(f)?;
        writeln!(f)?;

        self.write_summary(f)?;
        text_section(f, "ROOT CAUSE ANALYSIS", RULE, &resolution.root_cause)?;
        self.write_timeline(f)?;
        text_section(f, "SOLUTION IMPLEMENTATION", WIDE_RULE, &resolution.solution)?;
        text_section(f, "RESOLUTION COMMANDS", RULE, &resolution.fix_commands)?;
        text_section(f, "VERIFICATION & TESTING", WIDE_RULE, &resolution.verification)?;
        text_section(f, "PREVENTION MEASURES", RULE, &resolution.prevention)?;

        banner(f)?;
        writeln!(f, "End of RCA Report")?;
        writeln!(f, "Generated by {PRODUCT_NAME} on {}", self.generated)?;
        banner(f)
    }
}
