//! In-process session state with idle expiry.
//!
//! Sessions are keyed by `tenant_id:session_id` and live only in memory. A
//! restart drops in-flight flows, which is acceptable: the widget starts a
//! fresh session and completed bookings are already in SQLite.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use bothive_store::Booking;

use crate::types::DialogState;

/// Partially collected booking fields.
#[derive(Debug, Clone, Default)]
pub struct BookingDraft {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub service: Option<String>,
    pub email: Option<String>,
}

/// Everything remembered about one conversation between turns.
#[derive(Debug, Clone)]
pub struct Session {
    pub state: DialogState,
    pub draft: BookingDraft,
    /// Phone most recently used for a lookup or booking, so follow-ups like
    /// "cancel it" need not re-ask.
    pub last_phone: Option<String>,
    /// Phone captured for an in-progress update flow.
    pub update_phone: Option<String>,
    pub last_booking: Option<Booking>,
    last_activity: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            state: DialogState::Idle,
            draft: BookingDraft::default(),
            last_phone: None,
            update_phone: None,
            last_booking: None,
            last_activity: Instant::now(),
        }
    }

    /// Back to idle, keeping cross-flow memory (`last_phone`, `last_booking`).
    pub fn end_flow(&mut self) {
        self.state = DialogState::Idle;
        self.draft = BookingDraft::default();
        self.update_phone = None;
    }
}

/// Concurrent session map shared by all request handlers.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    fn key(tenant_id: &str, session_id: &str) -> String {
        format!("{}:{}", tenant_id, session_id)
    }

    /// Run `f` against the session, creating it on first contact. Touches the
    /// activity clock so active conversations never expire mid-flow.
    pub fn with_session<R>(
        &self,
        tenant_id: &str,
        session_id: &str,
        f: impl FnOnce(&mut Session) -> R,
    ) -> R {
        let mut entry = self
            .sessions
            .entry(Self::key(tenant_id, session_id))
            .or_insert_with(Session::new);
        entry.last_activity = Instant::now();
        f(entry.value_mut())
    }

    pub fn reset(&self, tenant_id: &str, session_id: &str) {
        self.sessions.remove(&Self::key(tenant_id, session_id));
    }

    /// Drop sessions idle longer than the TTL. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let before = self.sessions.len();
        let ttl = self.ttl;
        self.sessions
            .retain(|_, session| session.last_activity.elapsed() < ttl);
        let removed = before - self.sessions.len();
        if removed > 0 {
            debug!(removed, remaining = self.sessions.len(), "swept idle sessions");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(1800))
    }
}

/// Shared handle type used across the runtime and server.
pub type SharedSessions = Arc<SessionStore>;
