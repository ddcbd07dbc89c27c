//! In-memory session store.
//!
//! The store owns every [`Session`] for the life of the process. Callers get
//! cloned snapshots back and refer to sessions only by identifier. Nothing is
//! persisted or evicted: a session lives until it is reset.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{Local, Utc};
use tracing::{debug, info};

use crate::record::{IssueInfo, Resolution, Session, Step};
use crate::report;

/// Process-wide store of troubleshooting sessions.
///
/// One lock guards the whole map. Every mutating operation holds the write
/// guard for its full read-modify-write, so concurrent requests against the
/// same session cannot lose each other's steps.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Mutations are single assignments or Vec operations, so the map is
    // consistent even if a holder panicked.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn update<T>(&self, session_id: &str, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        self.write().get_mut(session_id).map(f)
    }

    /// Create and store a new empty session.
    pub fn create_session(&self) -> Session {
        let session = Session::new();
        self.write()
            .insert(session.session_id.clone(), session.clone());
        debug!("Created session {}", session.session_id);
        session
    }

    /// Get a snapshot of a session, or `None` if the id is unknown.
    #[must_use]
    pub fn get_session(&self, session_id: &str) -> Option<Session> {
        self.read().get(session_id).cloned()
    }

    /// Replace the session's issue description wholesale.
    ///
    /// Returns `false` if the session is unknown.
    pub fn update_issue_info(&self, session_id: &str, issue_info: IssueInfo) -> bool {
        self.update(session_id, |session| session.issue_info = issue_info)
            .is_some()
    }

    /// Record a diagnostic step.
    ///
    /// Returns `None` if the session is unknown, or if `command` and `output`
    /// are both blank after trimming; an analysis on its own is not a step.
    /// The text is stored as given, untrimmed.
    pub fn add_step(
        &self,
        session_id: &str,
        command: &str,
        output: &str,
        analysis: &str,
    ) -> Option<Step> {
        if command.trim().is_empty() && output.trim().is_empty() {
            debug!("Rejected step without command or output for {session_id}");
            return None;
        }

        let step = self.update(session_id, |session| {
            session.add_step(command, output, analysis)
        })?;
        debug!("Added step {} to session {session_id}", step.id);
        Some(step)
    }

    /// Remove the first step whose id is `step_id`.
    ///
    /// Returns `false` if the session is unknown or has no such step.
    pub fn remove_step(&self, session_id: &str, step_id: u32) -> bool {
        let removed = self
            .update(session_id, |session| session.remove_step(step_id))
            .unwrap_or(false);
        if removed {
            debug!("Removed step {step_id} from session {session_id}");
        }
        removed
    }

    /// Replace the session's resolution wholesale.
    ///
    /// Returns `false` if the session is unknown.
    pub fn update_resolution(&self, session_id: &str, resolution: Resolution) -> bool {
        self.update(session_id, |session| session.resolution = resolution)
            .is_some()
    }

    /// Render the Markdown report for a session.
    #[must_use]
    pub fn generate_report(&self, session_id: &str) -> Option<String> {
        let session = self.get_session(session_id)?;
        Some(report::markdown::render(&session, &Local::now()))
    }

    /// Mark the session's RCA as completed now and render the RCA document.
    ///
    /// Each call moves `completed_at` forward to the current time.
    pub fn generate_rca_report(&self, session_id: &str) -> Option<String> {
        let now = Local::now();
        let session = self.update(session_id, |session| {
            session.completed_at = Some(now.with_timezone(&Utc));
            session.clone()
        })?;
        info!("Completed RCA for session {session_id}");
        Some(report::rca::render(&session, &now))
    }

    /// Render the RCA document without touching `completed_at`.
    #[must_use]
    pub fn generate_rca_document(&self, session_id: &str) -> Option<String> {
        let session = self.get_session(session_id)?;
        Some(report::rca::render(&session, &Local::now()))
    }

    /// Delete a session. Returns whether it existed.
    pub fn reset_session(&self, session_id: &str) -> bool {
        let existed = self.write().remove(session_id).is_some();
        if existed {
            debug!("Reset session {session_id}");
        }
        existed
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the store holds no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
