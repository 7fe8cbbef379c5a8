//! In-process session state for the single operator role.
//!
//! Everything the browser front end used to scatter across module
//! globals and sessionStorage lives here instead: the login flag, the
//! transient status messages, the roster cache from the most recent
//! batch load, and the one-shot analysis handoff consumed by the
//! report page.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::types::{AnalysisRecord, Student};

/// Form status messages linger for five seconds.
pub const STATUS_TTL: Duration = Duration::from_secs(5);

/// The inline analysis error is shorter-lived: three seconds.
pub const INLINE_ERROR_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Severity {
    Success,
    Error,
}

/// A transient message bound to one display region. A later write to
/// the same region replaces it (last-write-wins); reads after the
/// deadline see nothing.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
    expires_at: Instant,
}

impl StatusMessage {
    fn new(text: String, severity: Severity, now: Instant, ttl: Duration) -> Self {
        Self {
            text,
            severity,
            expires_at: now + ttl,
        }
    }

    fn is_live_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// The two status display regions on the dashboard.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StatusRegion {
    Register,
    Mark,
}

/// Roster cached by the most recent successful batch load. An empty
/// student list is a valid cached state (renders the placeholder row).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LoadedRoster {
    pub batch: String,
    pub students: Vec<Student>,
}

/// One-shot transfer payload between the analysis query and the report
/// page. Consumed exactly once via [`SessionStore::take_report`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportHandoff {
    pub records: Vec<AnalysisRecord>,
    pub student_id: String,
    pub month: u32,
    pub year: i32,
}

#[derive(Debug, Default)]
struct Session {
    role: String,
    register_status: Option<StatusMessage>,
    mark_status: Option<StatusMessage>,
    analysis_error: Option<StatusMessage>,
    roster: Option<LoadedRoster>,
    report: Option<ReportHandoff>,
}

/// Store of live operator sessions, keyed by the opaque cookie token.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl SessionStore {
    /// Issue a fresh session token for an authenticated operator.
    pub fn create(&self, role: &str) -> Uuid {
        let token = Uuid::new_v4();
        let session = Session {
            role: role.to_string(),
            ..Session::default()
        };
        self.sessions.lock().unwrap().insert(token, session);
        token
    }

    /// Whether the token belongs to a live session. Absence fails the
    /// page guard closed.
    pub fn contains(&self, token: Uuid) -> bool {
        self.sessions.lock().unwrap().contains_key(&token)
    }

    pub fn revoke(&self, token: Uuid) {
        self.sessions.lock().unwrap().remove(&token);
    }

    pub fn role(&self, token: Uuid) -> Option<String> {
        self.sessions
            .lock()
            .unwrap()
            .get(&token)
            .map(|s| s.role.clone())
    }

    pub fn set_status(&self, token: Uuid, region: StatusRegion, text: &str, severity: Severity) {
        self.set_status_at(token, region, text, severity, Instant::now());
    }

    fn set_status_at(
        &self,
        token: Uuid,
        region: StatusRegion,
        text: &str,
        severity: Severity,
        now: Instant,
    ) {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(session) = sessions.get_mut(&token) {
            let message = StatusMessage::new(text.to_string(), severity, now, STATUS_TTL);
            match region {
                StatusRegion::Register => session.register_status = Some(message),
                StatusRegion::Mark => session.mark_status = Some(message),
            }
        }
    }

    pub fn status(&self, token: Uuid, region: StatusRegion) -> Option<StatusMessage> {
        self.status_at(token, region, Instant::now())
    }

    fn status_at(&self, token: Uuid, region: StatusRegion, now: Instant) -> Option<StatusMessage> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.get_mut(&token)?;
        let slot = match region {
            StatusRegion::Register => &mut session.register_status,
            StatusRegion::Mark => &mut session.mark_status,
        };
        if slot.as_ref().is_some_and(|m| !m.is_live_at(now)) {
            *slot = None;
        }
        slot.clone()
    }

    pub fn set_analysis_error(&self, token: Uuid, text: &str) {
        self.set_analysis_error_at(token, text, Instant::now());
    }

    fn set_analysis_error_at(&self, token: Uuid, text: &str, now: Instant) {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(session) = sessions.get_mut(&token) {
            session.analysis_error = Some(StatusMessage::new(
                text.to_string(),
                Severity::Error,
                now,
                INLINE_ERROR_TTL,
            ));
        }
    }

    pub fn analysis_error(&self, token: Uuid) -> Option<String> {
        self.analysis_error_at(token, Instant::now())
    }

    fn analysis_error_at(&self, token: Uuid, now: Instant) -> Option<String> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions.get_mut(&token)?;
        if session
            .analysis_error
            .as_ref()
            .is_some_and(|m| !m.is_live_at(now))
        {
            session.analysis_error = None;
        }
        session.analysis_error.as_ref().map(|m| m.text.clone())
    }

    /// Replace the cached roster with the most recent load.
    pub fn set_roster(&self, token: Uuid, roster: LoadedRoster) {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(session) = sessions.get_mut(&token) {
            session.roster = Some(roster);
        }
    }

    /// Drop the cached roster, leaving the table empty after a failed load.
    pub fn clear_roster(&self, token: Uuid) {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(session) = sessions.get_mut(&token) {
            session.roster = None;
        }
    }

    pub fn roster(&self, token: Uuid) -> Option<LoadedRoster> {
        self.sessions
            .lock()
            .unwrap()
            .get(&token)
            .and_then(|s| s.roster.clone())
    }

    pub fn stash_report(&self, token: Uuid, handoff: ReportHandoff) {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(session) = sessions.get_mut(&token) {
            session.report = Some(handoff);
        }
    }

    /// Consume the stashed analysis payload. The slot is cleared on
    /// every call, so a second read sees nothing.
    pub fn take_report(&self, token: Uuid) -> Option<ReportHandoff> {
        self.sessions
            .lock()
            .unwrap()
            .get_mut(&token)
            .and_then(|s| s.report.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_session() -> (SessionStore, Uuid) {
        let store = SessionStore::default();
        let token = store.create("teacher");
        (store, token)
    }

    #[test]
    fn test_create_and_revoke() {
        let (store, token) = store_with_session();

        assert!(store.contains(token));
        assert_eq!(store.role(token).as_deref(), Some("teacher"));

        store.revoke(token);
        assert!(!store.contains(token));
    }

    #[test]
    fn test_unknown_token_is_not_contained() {
        let store = SessionStore::default();
        assert!(!store.contains(Uuid::new_v4()));
    }

    #[test]
    fn test_status_expires_after_ttl() {
        let (store, token) = store_with_session();
        let now = Instant::now();

        store.set_status_at(token, StatusRegion::Register, "saved", Severity::Success, now);

        let live = store.status_at(token, StatusRegion::Register, now + Duration::from_secs(4));
        assert_eq!(live.unwrap().text, "saved");

        let expired = store.status_at(token, StatusRegion::Register, now + Duration::from_secs(6));
        assert!(expired.is_none());
    }

    #[test]
    fn test_status_last_write_wins() {
        let (store, token) = store_with_session();
        let now = Instant::now();

        store.set_status_at(token, StatusRegion::Mark, "first", Severity::Error, now);
        store.set_status_at(token, StatusRegion::Mark, "second", Severity::Success, now);

        let message = store.status_at(token, StatusRegion::Mark, now).unwrap();
        assert_eq!(message.text, "second");
        assert_eq!(message.severity, Severity::Success);
    }

    #[test]
    fn test_status_regions_are_independent() {
        let (store, token) = store_with_session();
        let now = Instant::now();

        store.set_status_at(token, StatusRegion::Register, "added", Severity::Success, now);

        assert!(store.status_at(token, StatusRegion::Mark, now).is_none());
        assert!(store.status_at(token, StatusRegion::Register, now).is_some());
    }

    #[test]
    fn test_analysis_error_uses_short_ttl() {
        let (store, token) = store_with_session();
        let now = Instant::now();

        store.set_analysis_error_at(token, "missing fields", now);

        assert_eq!(
            store.analysis_error_at(token, now + Duration::from_secs(2)),
            Some("missing fields".to_string())
        );
        assert_eq!(store.analysis_error_at(token, now + Duration::from_secs(4)), None);
    }

    #[test]
    fn test_roster_replacement_and_clear() {
        let (store, token) = store_with_session();
        let roster = LoadedRoster {
            batch: "6:00 am - 7:00 am".to_string(),
            students: Vec::new(),
        };

        store.set_roster(token, roster.clone());
        assert_eq!(store.roster(token), Some(roster));

        store.clear_roster(token);
        assert!(store.roster(token).is_none());
    }

    #[test]
    fn test_report_handoff_is_one_shot() {
        let (store, token) = store_with_session();
        let handoff = ReportHandoff {
            records: Vec::new(),
            student_id: "7".to_string(),
            month: 3,
            year: 2025,
        };

        store.stash_report(token, handoff.clone());

        assert_eq!(store.take_report(token), Some(handoff));
        assert_eq!(store.take_report(token), None);
    }

    #[test]
    fn test_writes_to_revoked_session_are_ignored() {
        let (store, token) = store_with_session();
        store.revoke(token);

        store.set_status(token, StatusRegion::Register, "late", Severity::Error);
        assert!(store.status(token, StatusRegion::Register).is_none());
    }
}
