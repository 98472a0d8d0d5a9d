//! Session lifecycle manager — create, validate, refresh, invalidate.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use farmgate_core::config::session::SessionConfig;
use farmgate_entity::Session;

use super::store::{SessionStats, SessionStore};

/// Reason a session failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionDenial {
    /// Session validation is globally disabled by configuration.
    ValidationDisabled,
    /// No session exists under the given id.
    NotFound,
    /// The session was already invalidated.
    Inactive,
    /// The session idle-expired without being refreshed in time.
    IdleExpired,
    /// The session reached its absolute lifetime ceiling.
    MaxExpired,
}

impl SessionDenial {
    /// Human-readable denial reason.
    pub fn message(&self) -> &'static str {
        match self {
            Self::ValidationDisabled => "Session validation is disabled",
            Self::NotFound => "Session not found",
            Self::Inactive => "Session is inactive",
            Self::IdleExpired => "Session expired due to inactivity",
            Self::MaxExpired => "Session expired due to maximum duration",
        }
    }
}

impl fmt::Display for SessionDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of validating a session.
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    /// The session is live; carries a snapshot and the idle time left.
    Valid {
        /// Snapshot of the session at validation time.
        session: Session,
        /// Idle time remaining before the session would expire.
        time_remaining: Duration,
    },
    /// The session was rejected.
    Invalid {
        /// Why the session was rejected.
        reason: SessionDenial,
    },
}

impl SessionOutcome {
    /// Whether the outcome admits the session.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    fn invalid(reason: SessionDenial) -> Self {
        Self::Invalid { reason }
    }
}

/// Manages session lifecycle over a shared [`SessionStore`].
///
/// Sessions carry dual expiry: an idle deadline that slides forward on
/// each refresh and an absolute ceiling fixed at creation. Expiry marks
/// a session inactive and drops it from the table; inactive is terminal.
#[derive(Debug, Clone)]
pub struct SessionManager {
    /// Shared session table.
    store: Arc<SessionStore>,
    /// Session configuration.
    config: SessionConfig,
}

impl SessionManager {
    /// Creates a new manager over a session store.
    pub fn new(store: Arc<SessionStore>, config: SessionConfig) -> Self {
        Self { store, config }
    }

    /// Create a session for an authenticated user.
    pub fn create(
        &self,
        user_id: Uuid,
        role: &str,
        ip_address: Option<IpAddr>,
        user_agent: Option<String>,
    ) -> Session {
        self.create_at(Utc::now(), user_id, role, ip_address, user_agent)
    }

    /// Create a session as of an explicit instant.
    pub fn create_at(
        &self,
        now: DateTime<Utc>,
        user_id: Uuid,
        role: &str,
        ip_address: Option<IpAddr>,
        user_agent: Option<String>,
    ) -> Session {
        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            role: role.to_string(),
            created_at: now,
            last_accessed: now,
            idle_expires_at: now + self.idle_timeout(),
            max_expires_at: now + Duration::hours(self.config.max_duration_hours as i64),
            is_active: true,
            ip_address,
            user_agent,
        };

        self.store.insert(session.clone());
        debug!(session_id = %session.id, user_id = %user_id, role, "Session created");

        session
    }

    /// Validate a session without extending it.
    pub fn validate(&self, id: Uuid) -> SessionOutcome {
        self.validate_at(Utc::now(), id)
    }

    /// Validate a session as of an explicit instant.
    ///
    /// 1. Reject everything when validation is disabled
    /// 2. Unknown id → not found
    /// 3. Inactive → inactive (terminal)
    /// 4. Past the absolute ceiling → max-duration expiry, session dropped
    /// 5. Past the idle deadline → idle expiry, session dropped
    /// 6. Otherwise valid, reporting the idle time remaining
    ///
    /// The ceiling is checked before the idle deadline so a session past
    /// both always reports the max-duration reason. Validation never
    /// advances `last_accessed`; only refresh does.
    pub fn validate_at(&self, now: DateTime<Utc>, id: Uuid) -> SessionOutcome {
        if !self.config.enable_validation {
            return SessionOutcome::invalid(SessionDenial::ValidationDisabled);
        }

        let outcome = self.store.with_entry(id, |session| {
            if !session.is_active {
                return SessionOutcome::invalid(SessionDenial::Inactive);
            }
            if session.is_max_expired(now) {
                session.is_active = false;
                return SessionOutcome::invalid(SessionDenial::MaxExpired);
            }
            if session.is_idle_expired(now) {
                session.is_active = false;
                return SessionOutcome::invalid(SessionDenial::IdleExpired);
            }
            SessionOutcome::Valid {
                session: session.clone(),
                time_remaining: session.idle_remaining(now),
            }
        });

        let Some(outcome) = outcome else {
            return SessionOutcome::invalid(SessionDenial::NotFound);
        };

        if let SessionOutcome::Invalid { reason } = outcome {
            // Expired sessions were marked inactive under the entry lock;
            // drop them from the table now that the lock is released.
            if matches!(reason, SessionDenial::IdleExpired | SessionDenial::MaxExpired) {
                self.store.remove_inactive(id);
                debug!(session_id = %id, reason = %reason, "Session expired");
            }
        }

        outcome
    }

    /// Refresh a session, sliding its idle deadline forward.
    pub fn refresh(&self, id: Uuid) -> Option<Session> {
        self.refresh_at(Utc::now(), id)
    }

    /// Refresh a session as of an explicit instant.
    ///
    /// Rejects (and invalidates) sessions that are inactive or past the
    /// absolute ceiling. The new idle deadline is clamped to the ceiling
    /// so a refresh can never extend a session beyond its maximum
    /// lifetime.
    pub fn refresh_at(&self, now: DateTime<Utc>, id: Uuid) -> Option<Session> {
        let refreshed = self.store.with_entry(id, |session| {
            if !session.is_active || session.is_max_expired(now) {
                session.is_active = false;
                return None;
            }
            session.last_accessed = now;
            session.idle_expires_at = (now + self.idle_timeout()).min(session.max_expires_at);
            Some(session.clone())
        });

        match refreshed {
            None => {
                warn!(session_id = %id, "Attempted to refresh unknown session");
                None
            }
            Some(None) => {
                self.store.remove_inactive(id);
                debug!(session_id = %id, "Refresh rejected, session invalidated");
                None
            }
            Some(Some(session)) => {
                debug!(session_id = %id, "Session refreshed");
                Some(session)
            }
        }
    }

    /// Invalidate a session, marking it inactive and dropping it.
    ///
    /// Idempotent: returns `false` when the id is unknown.
    pub fn invalidate(&self, id: Uuid) -> bool {
        let marked = self.store.with_entry(id, |session| {
            session.is_active = false;
        });

        if marked.is_none() {
            return false;
        }

        self.store.remove_inactive(id);
        debug!(session_id = %id, "Session invalidated");
        true
    }

    /// Current session table statistics.
    pub fn stats(&self) -> SessionStats {
        self.store.stats(Utc::now())
    }

    /// Drop inactive and max-expired sessions from the table.
    pub fn cleanup_expired(&self) -> u64 {
        self.store.sweep(Utc::now())
    }

    fn idle_timeout(&self) -> Duration {
        Duration::hours(self.config.idle_timeout_hours as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new(Arc::new(SessionStore::new()), SessionConfig::default())
    }

    fn manager_with(config: SessionConfig) -> SessionManager {
        SessionManager::new(Arc::new(SessionStore::new()), config)
    }

    #[test]
    fn created_session_validates_with_idle_time_remaining() {
        let m = manager();
        let now = Utc::now();
        let session = m.create_at(now, Uuid::new_v4(), "manager", None, None);

        match m.validate_at(now + Duration::minutes(30), session.id) {
            SessionOutcome::Valid {
                session: snapshot,
                time_remaining,
            } => {
                assert_eq!(snapshot.id, session.id);
                assert_eq!(time_remaining, Duration::minutes(90));
            }
            other => panic!("expected valid outcome, got {other:?}"),
        }
    }

    #[test]
    fn unknown_session_is_not_found() {
        let m = manager();
        match m.validate(Uuid::new_v4()) {
            SessionOutcome::Invalid { reason } => assert_eq!(reason, SessionDenial::NotFound),
            other => panic!("expected denial, got {other:?}"),
        }
    }

    #[test]
    fn disabled_validation_rejects_live_sessions() {
        let m = manager_with(SessionConfig {
            enable_validation: false,
            ..SessionConfig::default()
        });
        let session = m.create(Uuid::new_v4(), "user", None, None);

        match m.validate(session.id) {
            SessionOutcome::Invalid { reason } => {
                assert_eq!(reason, SessionDenial::ValidationDisabled);
            }
            other => panic!("expected denial, got {other:?}"),
        }
    }

    #[test]
    fn idle_expiry_invalidates_and_removes() {
        let m = manager();
        let now = Utc::now();
        let session = m.create_at(now, Uuid::new_v4(), "user", None, None);

        let later = now + Duration::hours(2) + Duration::seconds(1);
        match m.validate_at(later, session.id) {
            SessionOutcome::Invalid { reason } => assert_eq!(reason, SessionDenial::IdleExpired),
            other => panic!("expected idle expiry, got {other:?}"),
        }

        // The expired session is gone, so the next validation says so.
        match m.validate_at(later, session.id) {
            SessionOutcome::Invalid { reason } => assert_eq!(reason, SessionDenial::NotFound),
            other => panic!("expected not-found, got {other:?}"),
        }
    }

    #[test]
    fn max_expiry_wins_over_idle_expiry() {
        let m = manager();
        let now = Utc::now();
        let session = m.create_at(now, Uuid::new_v4(), "user", None, None);

        // Past both deadlines; the absolute ceiling takes precedence.
        let later = now + Duration::hours(25);
        match m.validate_at(later, session.id) {
            SessionOutcome::Invalid { reason } => assert_eq!(reason, SessionDenial::MaxExpired),
            other => panic!("expected max expiry, got {other:?}"),
        }
    }

    #[test]
    fn validation_does_not_slide_the_idle_deadline() {
        let m = manager();
        let now = Utc::now();
        let session = m.create_at(now, Uuid::new_v4(), "user", None, None);

        assert!(m.validate_at(now + Duration::hours(1), session.id).is_valid());
        // One more hour and one second: past the original idle deadline.
        match m.validate_at(now + Duration::hours(2) + Duration::seconds(1), session.id) {
            SessionOutcome::Invalid { reason } => assert_eq!(reason, SessionDenial::IdleExpired),
            other => panic!("expected idle expiry, got {other:?}"),
        }
    }

    #[test]
    fn refresh_slides_the_idle_deadline() {
        let m = manager();
        let now = Utc::now();
        let session = m.create_at(now, Uuid::new_v4(), "user", None, None);

        let refresh_time = now + Duration::hours(1);
        let refreshed = m.refresh_at(refresh_time, session.id).unwrap();
        assert_eq!(refreshed.last_accessed, refresh_time);
        assert_eq!(refreshed.idle_expires_at, refresh_time + Duration::hours(2));

        // Valid past the original deadline thanks to the refresh.
        let later = now + Duration::hours(2) + Duration::minutes(30);
        assert!(m.validate_at(later, session.id).is_valid());
    }

    #[test]
    fn refresh_never_extends_past_the_ceiling() {
        let m = manager();
        let now = Utc::now();
        let session = m.create_at(now, Uuid::new_v4(), "user", None, None);

        // Refresh one hour before the ceiling: idle deadline clamps to it.
        let late = now + Duration::hours(23);
        let refreshed = m.refresh_at(late, session.id).unwrap();
        assert_eq!(refreshed.idle_expires_at, session.max_expires_at);
    }

    #[test]
    fn refresh_revives_an_idle_expired_session_under_the_ceiling() {
        // An idle-expired session that was never validated can still be
        // refreshed; only validation turns idle expiry terminal.
        let m = manager();
        let now = Utc::now();
        let session = m.create_at(now, Uuid::new_v4(), "user", None, None);

        let later = now + Duration::hours(3);
        assert!(m.refresh_at(later, session.id).is_some());
        assert!(m.validate_at(later, session.id).is_valid());
    }

    #[test]
    fn refresh_past_the_ceiling_invalidates() {
        let m = manager();
        let now = Utc::now();
        let session = m.create_at(now, Uuid::new_v4(), "user", None, None);

        assert!(m.refresh_at(now + Duration::hours(25), session.id).is_none());
        match m.validate_at(now + Duration::hours(25), session.id) {
            SessionOutcome::Invalid { reason } => assert_eq!(reason, SessionDenial::NotFound),
            other => panic!("expected not-found after rejected refresh, got {other:?}"),
        }
    }

    #[test]
    fn invalidate_is_idempotent() {
        let m = manager();
        let session = m.create(Uuid::new_v4(), "user", None, None);

        assert!(m.invalidate(session.id));
        assert!(!m.invalidate(session.id));

        match m.validate(session.id) {
            SessionOutcome::Invalid { reason } => assert_eq!(reason, SessionDenial::NotFound),
            other => panic!("expected not-found, got {other:?}"),
        }
    }

    #[test]
    fn cleanup_leaves_live_sessions_alone() {
        let m = manager();
        let now = Utc::now();
        let live = m.create_at(now, Uuid::new_v4(), "user", None, None);
        let doomed = m.create_at(now - Duration::hours(30), Uuid::new_v4(), "user", None, None);

        assert_eq!(m.cleanup_expired(), 1);
        assert!(m.validate(live.id).is_valid());
        match m.validate(doomed.id) {
            SessionOutcome::Invalid { reason } => assert_eq!(reason, SessionDenial::NotFound),
            other => panic!("expected not-found, got {other:?}"),
        }
    }
}
