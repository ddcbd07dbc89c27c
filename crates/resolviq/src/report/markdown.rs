//! Markdown troubleshooting report.

use std::fmt;

use chrono::{DateTime, TimeZone};

use crate::record::Session;

/// Render `session` as a Markdown report generated at `now`.
///
/// Sections without content are left out entirely, so an untouched session
/// renders as just the header block.
#[must_use]
pub fn render<Tz>(session: &Session, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    MarkdownReport {
        session,
        date: now.format("%Y-%m-%d").to_string(),
        time: now.format("%H:%M:%S").to_string(),
    }
    .to_string()
}

struct MarkdownReport<'a> {
    session: &'a Session,
    date: String,
    time: String,
}

impl MarkdownReport<'_> {
    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let issue = &self.session.issue_info;
        write!(
            f,
            "# Troubleshooting Report - {}\n\n",
            issue.display_title()
        )?;
        writeln!(f, "**Date:** {} {}", self.date, self.time)?;
        writeln!(f, "**Server/Environment:** {}", issue.server)?;
        writeln!(f, "**Initial Symptoms:** {}", issue.symptoms)?;
        write!(f, "**Priority:** {}\n\n", issue.priority)
    }

    fn write_steps(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.session.steps.is_empty() {
            return Ok(());
        }

        f.write_str("## Investigation Steps\n\n")?;
        for step in &self.session.steps {
            write!(f, "### Step {}: Investigation\n\n", step.id)?;

            if !step.command.is_empty() {
                write!(f, "**Command/Action:**\n```bash\n{}\n```\n\n", step.command)?;
            }
            if !step.output.is_empty() {
                write!(f, "**Output/Result:**\n```\n{}\n```\n\n", step.output)?;
            }
            if !step.analysis.is_empty() {
                write!(f, "**Analysis:** {}\n\n", step.analysis)?;
            }

            f.write_str("---\n\n")?;
        }
        Ok(())
    }

    fn write_resolution(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resolution = &self.session.resolution;
        if resolution.is_empty() {
            return Ok(());
        }

        f.write_str("## Resolution Summary\n\n")?;
        if !resolution.root_cause.is_empty() {
            write!(f, "**Root Cause:** {}\n\n", resolution.root_cause)?;
        }
        if !resolution.solution.is_empty() {
            write!(f, "**Solution Applied:** {}\n\n", resolution.solution)?;
        }
        if !resolution.fix_commands.is_empty() {
            write!(
                f,
                "**Resolution Commands:**\n```bash\n{}\n```\n\n",
                resolution.fix_commands
            )?;
        }
        if !resolution.verification.is_empty() {
            write!(f, "**Verification Steps:**\n{}\n\n", resolution.verification)?;
        }
        if !resolution.prevention.is_empty() {
            write!(
                f,
                "**Prevention/Future Monitoring:** {}\n\n",
                resolution.prevention
            )?;
        }

        writeln!(
            f,
            "**Time to Resolution:** {} investigation steps",
            self.session.steps.len()
        )?;
        write!(
            f,
            "**Total Investigation Time:** {} {}\n\n",
            self.date, self.time
        )
    }
}

impl fmt::Display for MarkdownReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_header(f)?;
        self.write_steps(f)?;
        self.write_resolution(f)
    }
}
