//! Troubleshooting record types.
//!
//! A [`Session`] collects everything recorded during one investigation: the
//! issue being chased, the ordered diagnostic [`Step`]s, and the closing
//! [`Resolution`]. Every type converts to and from a plain JSON object with
//! `to_value`/`from_value`; reading is lenient and falls back to each field's
//! default instead of failing.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Priority assigned to an issue when none is given.
pub const DEFAULT_PRIORITY: &str = "Medium";

/// Title shown in reports when the issue has none.
pub const FALLBACK_TITLE: &str = "Server Issue";

/// Description of the issue under investigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueInfo {
    /// Short title of the issue.
    pub title: String,
    /// Affected server or environment.
    pub server: String,
    /// Initial symptoms as first observed.
    pub symptoms: String,
    /// Free-form priority label; not restricted to a fixed set.
    pub priority: String,
}

impl Default for IssueInfo {
    fn default() -> Self {
        Self {
            title: String::new(),
            server: String::new(),
            symptoms: String::new(),
            priority: DEFAULT_PRIORITY.to_string(),
        }
    }
}

impl IssueInfo {
    /// The title to print in reports.
    #[must_use]
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            FALLBACK_TITLE
        } else {
            &self.title
        }
    }

    /// Convert to a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "title": self.title,
            "server": self.server,
            "symptoms": self.symptoms,
            "priority": self.priority,
        })
    }

    /// Read from a JSON object, defaulting any missing or malformed field.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let fields = Fields::of(value);
        Self {
            title: fields.string("title"),
            server: fields.string("server"),
            symptoms: fields.string("symptoms"),
            priority: fields.string_or("priority", DEFAULT_PRIORITY),
        }
    }
}

/// One investigation action: the command run, what it printed, and what the
/// analyst made of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Sequence number assigned at creation. Not renumbered on removal.
    pub id: u32,
    /// Command or action taken.
    #[serde(default)]
    pub command: String,
    /// Output or result observed.
    #[serde(default)]
    pub output: String,
    /// Analyst's interpretation.
    #[serde(default)]
    pub analysis: String,
    /// When the step was recorded.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Step {
    /// Create a step stamped with the current time.
    #[must_use]
    pub fn new(
        id: u32,
        command: impl Into<String>,
        output: impl Into<String>,
        analysis: impl Into<String>,
    ) -> Self {
        Self {
            id,
            command: command.into(),
            output: output.into(),
            analysis: analysis.into(),
            timestamp: Utc::now(),
        }
    }

    /// Convert to a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "id": self.id,
            "command": self.command,
            "output": self.output,
            "analysis": self.analysis,
            "timestamp": format_instant(&self.timestamp),
        })
    }

    /// Read from a JSON object.
    ///
    /// A missing or unusable `id` becomes `0`; a missing or unparseable
    /// `timestamp` becomes the current time.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let fields = Fields::of(value);
        Self {
            id: fields.u32("id").unwrap_or(0),
            command: fields.string("command"),
            output: fields.string("output"),
            analysis: fields.string("analysis"),
            timestamp: fields.instant("timestamp").unwrap_or_else(Utc::now),
        }
    }
}

/// Closing summary of an investigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resolution {
    /// What actually caused the issue.
    pub root_cause: String,
    /// What was done about it.
    pub solution: String,
    /// Commands used to apply the fix.
    pub fix_commands: String,
    /// How the fix was verified.
    pub verification: String,
    /// Measures against recurrence.
    pub prevention: String,
}

impl Resolution {
    /// True when every field is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root_cause.is_empty()
            && self.solution.is_empty()
            && self.fix_commands.is_empty()
            && self.verification.is_empty()
            && self.prevention.is_empty()
    }

    /// Convert to a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "root_cause": self.root_cause,
            "solution": self.solution,
            "fix_commands": self.fix_commands,
            "verification": self.verification,
            "prevention": self.prevention,
        })
    }

    /// Read from a JSON object, defaulting any missing or malformed field.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let fields = Fields::of(value);
        Self {
            root_cause: fields.string("root_cause"),
            solution: fields.string("solution"),
            fix_commands: fields.string("fix_commands"),
            verification: fields.string("verification"),
            prevention: fields.string("prevention"),
        }
    }
}

/// One troubleshooting record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque identifier handed to the client.
    pub session_id: String,
    /// The issue under investigation.
    #[serde(default)]
    pub issue_info: IssueInfo,
    /// Steps in the order they were recorded.
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Closing summary.
    #[serde(default)]
    pub resolution: Resolution,
    /// When the session was created.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// When the RCA was finalized, if it has been.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create an empty session with a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_id: new_session_id(),
            issue_info: IssueInfo::default(),
            steps: Vec::new(),
            resolution: Resolution::default(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Append a step numbered `len(steps) + 1` and return a copy of it.
    ///
    /// After a removal the number can match a step that is still present.
    pub fn add_step(&mut self, command: &str, output: &str, analysis: &str) -> Step {
        let id = u32::try_from(self.steps.len() + 1).unwrap_or(u32::MAX);
        let step = Step::new(id, command, output, analysis);
        self.steps.push(step.clone());
        step
    }

    /// Remove the first step with the given id. Remaining ids are unchanged.
    pub fn remove_step(&mut self, step_id: u32) -> bool {
        match self.steps.iter().position(|step| step.id == step_id) {
            Some(index) => {
                self.steps.remove(index);
                true
            }
            None => false,
        }
    }

    /// Whether the RCA has been finalized.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Convert to a JSON object, including nested records.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "session_id": self.session_id,
            "issue_info": self.issue_info.to_value(),
            "steps": self.steps.iter().map(Step::to_value).collect::<Vec<_>>(),
            "resolution": self.resolution.to_value(),
            "created_at": format_instant(&self.created_at),
            "completed_at": self.completed_at.as_ref().map(format_instant),
        })
    }

    /// Read from a JSON object.
    ///
    /// Missing pieces are filled in: a fresh identifier, default issue and
    /// resolution, no steps, the current time for `created_at`, and no
    /// completion time.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let fields = Fields::of(value);
        let steps = fields
            .get("steps")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Step::from_value).collect())
            .unwrap_or_default();

        Self {
            session_id: fields
                .get("session_id")
                .and_then(Value::as_str)
                .map_or_else(new_session_id, str::to_string),
            issue_info: IssueInfo::from_value(fields.get("issue_info").unwrap_or(&Value::Null)),
            steps,
            resolution: Resolution::from_value(fields.get("resolution").unwrap_or(&Value::Null)),
            created_at: fields.instant("created_at").unwrap_or_else(Utc::now),
            completed_at: fields.instant("completed_at"),
        }
    }
}

/// Generate a new random session identifier.
#[must_use]
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Lenient field access over something that should be a JSON object.
struct Fields<'a>(Option<&'a Map<String, Value>>);

impl<'a> Fields<'a> {
    fn of(value: &'a Value) -> Self {
        Self(value.as_object())
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.and_then(|map| map.get(key))
    }

    fn string(&self, key: &str) -> String {
        self.string_or(key, "")
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    fn u32(&self, key: &str) -> Option<u32> {
        self.get(key)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    }

    fn instant(&self, key: &str) -> Option<DateTime<Utc>> {
        self.get(key)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> Session {
        let mut session = Session::new();
        session.issue_info = IssueInfo {
            title: "Disk full".to_string(),
            server: "web-01".to_string(),
            symptoms: "502s from nginx".to_string(),
            priority: "High".to_string(),
        };
        session.add_step("df -h", "/dev/sda1 100%", "root volume is full");
        session.add_step("du -sh /var/log", "38G", "");
        session.resolution = Resolution {
            root_cause: "logrotate disabled".to_string(),
            solution: "re-enabled logrotate".to_string(),
            fix_commands: "systemctl enable --now logrotate.timer".to_string(),
            verification: "df -h shows 41%".to_string(),
            prevention: "disk usage alert at 80%".to_string(),
        };
        session
    }

    #[test]
    fn test_issue_info_default_priority() {
        let issue = IssueInfo::default();
        assert_eq!(issue.priority, "Medium");
        assert!(issue.title.is_empty());
    }

    #[test]
    fn test_display_title_fallback() {
        let mut issue = IssueInfo::default();
        assert_eq!(issue.display_title(), "Server Issue");

        issue.title = "Slow queries".to_string();
        assert_eq!(issue.display_title(), "Slow queries");
    }

    #[test]
    fn test_issue_info_from_empty_object() {
        let issue = IssueInfo::from_value(&json!({}));
        assert_eq!(issue, IssueInfo::default());
    }

    #[test]
    fn test_issue_info_accepts_any_priority() {
        let issue = IssueInfo::from_value(&json!({"priority": "whenever"}));
        assert_eq!(issue.priority, "whenever");
    }

    #[test]
    fn test_issue_info_wrong_types_default() {
        let issue = IssueInfo::from_value(&json!({"title": 42, "priority": null}));
        assert_eq!(issue.title, "");
        assert_eq!(issue.priority, "Medium");
    }

    #[test]
    fn test_from_non_object() {
        assert_eq!(IssueInfo::from_value(&json!("nope")), IssueInfo::default());
        assert_eq!(Resolution::from_value(&json!([1, 2])), Resolution::default());
        assert_eq!(Step::from_value(&Value::Null).id, 0);
    }

    #[test]
    fn test_issue_info_round_trip() {
        let issue = sample_session().issue_info;
        assert_eq!(IssueInfo::from_value(&issue.to_value()), issue);
    }

    #[test]
    fn test_step_round_trip() {
        let step = Step::new(3, "uptime", "load average: 9.1", "cpu bound");
        assert_eq!(Step::from_value(&step.to_value()), step);
    }

    #[test]
    fn test_step_missing_fields() {
        let before = Utc::now();
        let step = Step::from_value(&json!({"id": 7}));
        assert_eq!(step.id, 7);
        assert!(step.command.is_empty());
        assert!(step.output.is_empty());
        assert!(step.analysis.is_empty());
        assert!(step.timestamp >= before);
    }

    #[test]
    fn test_step_bad_id_and_timestamp() {
        let step = Step::from_value(&json!({"id": -4, "timestamp": "yesterday"}));
        assert_eq!(step.id, 0);
        assert!(step.timestamp <= Utc::now());
    }

    #[test]
    fn test_step_timestamp_is_iso8601() {
        let step = Step::new(1, "ls", "", "");
        let value = step.to_value();
        let text = value["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(text).is_ok());
    }

    #[test]
    fn test_resolution_round_trip() {
        let resolution = sample_session().resolution;
        assert_eq!(Resolution::from_value(&resolution.to_value()), resolution);
    }

    #[test]
    fn test_resolution_is_empty() {
        let mut resolution = Resolution::default();
        assert!(resolution.is_empty());

        resolution.prevention = "alerting".to_string();
        assert!(!resolution.is_empty());
    }

    #[test]
    fn test_session_round_trip() {
        let mut session = sample_session();
        session.completed_at = Some(Utc::now());
        assert_eq!(Session::from_value(&session.to_value()), session);
    }

    #[test]
    fn test_session_round_trip_without_completion() {
        let session = sample_session();
        let value = session.to_value();
        assert!(value["completed_at"].is_null());
        assert_eq!(Session::from_value(&value), session);
    }

    #[test]
    fn test_session_from_empty_object() {
        let session = Session::from_value(&json!({}));
        assert!(!session.session_id.is_empty());
        assert_eq!(session.issue_info, IssueInfo::default());
        assert!(session.steps.is_empty());
        assert_eq!(session.resolution, Resolution::default());
        assert!(session.completed_at.is_none());
    }

    #[test]
    fn test_session_ignores_unknown_keys() {
        let session = Session::from_value(&json!({
            "session_id": "abc",
            "flavour": "strawberry",
            "steps": [{"id": 1, "command": "ls"}],
        }));
        assert_eq!(session.session_id, "abc");
        assert_eq!(session.steps.len(), 1);
        assert_eq!(session.steps[0].command, "ls");
    }

    #[test]
    fn test_new_sessions_have_distinct_ids() {
        assert_ne!(Session::new().session_id, Session::new().session_id);
    }

    #[test]
    fn test_add_step_sequential_ids() {
        let mut session = Session::new();
        let ids: Vec<u32> = (0..4)
            .map(|i| session.add_step(&format!("cmd {i}"), "", "").id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_remove_step_does_not_renumber() {
        let mut session = Session::new();
        session.add_step("a", "", "");
        session.add_step("b", "", "");
        session.add_step("c", "", "");

        assert!(session.remove_step(2));
        let ids: Vec<u32> = session.steps.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(!session.remove_step(2));
    }

    #[test]
    fn test_add_after_remove_reuses_id() {
        let mut session = Session::new();
        session.add_step("a", "", "");
        session.add_step("b", "", "");
        session.add_step("c", "", "");
        session.remove_step(1);

        let step = session.add_step("d", "", "");
        assert_eq!(step.id, 3);
        let threes = session.steps.iter().filter(|s| s.id == 3).count();
        assert_eq!(threes, 2);
    }

    #[test]
    fn test_remove_step_removes_first_match_only() {
        let mut session = Session::new();
        session.add_step("a", "", "");
        session.add_step("b", "", "");
        session.remove_step(1);
        session.add_step("c", "", ""); // id 2 again

        assert!(session.remove_step(2));
        assert_eq!(session.steps.len(), 1);
        assert_eq!(session.steps[0].command, "c");
    }

    #[test]
    fn test_serde_matches_to_value() {
        let session = sample_session();
        let via_serde = serde_json::to_value(&session).unwrap();
        assert_eq!(Session::from_value(&via_serde), session);
    }
}
