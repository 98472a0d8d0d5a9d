//! Concurrent session table.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use farmgate_entity::Session;

/// Point-in-time session table statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    /// Sessions that are active and not idle-expired.
    pub active_sessions: u64,
    /// Active session count per role.
    pub sessions_by_role: HashMap<String, u64>,
    /// Sessions created within the last hour.
    pub recent_sessions: u64,
    /// Sessions that are inactive or idle-expired but not yet swept.
    pub expired_sessions: u64,
}

/// The session table, keyed by session id.
///
/// Per-id mutations go through [`with_entry`](Self::with_entry) and are
/// atomic for that id; operations on different ids do not contend.
/// The table is owned here and handed to the manager by `Arc`.
#[derive(Debug)]
pub struct SessionStore {
    /// Session id → session
    sessions: DashMap<Uuid, Session>,
}

impl SessionStore {
    /// Create an empty session store
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Insert a freshly created session
    pub fn insert(&self, session: Session) {
        self.sessions.insert(session.id, session);
    }

    /// Snapshot a session by id
    pub fn get(&self, id: Uuid) -> Option<Session> {
        self.sessions.get(&id).map(|r| r.value().clone())
    }

    /// Run `f` against the session under its entry lock.
    ///
    /// Returns `None` when the id is unknown. The closure must not call
    /// back into the store for the same id.
    pub fn with_entry<R>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        self.sessions.get_mut(&id).map(|mut r| f(r.value_mut()))
    }

    /// Drop a session that has been marked inactive.
    ///
    /// The condition re-checks under the entry lock, so a concurrent
    /// re-insert of the same id is never removed by mistake.
    pub fn remove_inactive(&self, id: Uuid) -> bool {
        self.sessions.remove_if(&id, |_, s| !s.is_active).is_some()
    }

    /// Number of sessions currently in the table, swept or not
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Remove every inactive or max-expired session, returning how many
    /// were dropped. Idle-expired sessions stay until validated or until
    /// they pass their absolute ceiling.
    pub fn sweep(&self, now: DateTime<Utc>) -> u64 {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| session.is_active && !session.is_max_expired(now));
        let removed = before.saturating_sub(self.sessions.len()) as u64;

        if removed > 0 {
            debug!(removed, "Cleaned up expired sessions");
        }
        removed
    }

    /// Compute table statistics at `now`.
    pub fn stats(&self, now: DateTime<Utc>) -> SessionStats {
        let recent_threshold = now - Duration::hours(1);
        let mut stats = SessionStats::default();

        for entry in self.sessions.iter() {
            let session = entry.value();

            if session.is_active && now < session.idle_expires_at {
                stats.active_sessions += 1;
                *stats
                    .sessions_by_role
                    .entry(session.role.clone())
                    .or_default() += 1;
            } else {
                stats.expired_sessions += 1;
            }

            if session.created_at > recent_threshold {
                stats.recent_sessions += 1;
            }
        }

        stats
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_at(now: DateTime<Utc>, role: &str) -> Session {
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role: role.to_string(),
            created_at: now,
            last_accessed: now,
            idle_expires_at: now + Duration::hours(2),
            max_expires_at: now + Duration::hours(24),
            is_active: true,
            ip_address: None,
            user_agent: None,
        }
    }

    #[test]
    fn sweep_drops_inactive_and_max_expired_only() {
        let store = SessionStore::new();
        let now = Utc::now();

        let live = session_at(now, "user");
        let live_id = live.id;
        store.insert(live);

        let mut inactive = session_at(now, "user");
        inactive.is_active = false;
        store.insert(inactive);

        let mut over_ceiling = session_at(now, "user");
        over_ceiling.max_expires_at = now - Duration::seconds(1);
        store.insert(over_ceiling);

        // Idle-expired but under the ceiling: stays until validated.
        let mut idle_expired = session_at(now, "user");
        idle_expired.idle_expires_at = now - Duration::minutes(5);
        let idle_id = idle_expired.id;
        store.insert(idle_expired);

        assert_eq!(store.sweep(now), 2);
        assert!(store.get(live_id).is_some());
        assert!(store.get(idle_id).is_some());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn remove_inactive_spares_live_sessions() {
        let store = SessionStore::new();
        let now = Utc::now();
        let session = session_at(now, "user");
        let id = session.id;
        store.insert(session);

        assert!(!store.remove_inactive(id));
        assert!(store.get(id).is_some());

        store.with_entry(id, |s| s.is_active = false);
        assert!(store.remove_inactive(id));
        assert!(store.get(id).is_none());
    }

    #[test]
    fn stats_partition_active_and_expired() {
        let store = SessionStore::new();
        let now = Utc::now();

        store.insert(session_at(now, "manager"));
        store.insert(session_at(now, "manager"));
        store.insert(session_at(now, "cashier"));

        let mut stale = session_at(now - Duration::hours(3), "cashier");
        stale.idle_expires_at = now - Duration::hours(1);
        store.insert(stale);

        let stats = store.stats(now);
        assert_eq!(stats.active_sessions, 3);
        assert_eq!(stats.sessions_by_role.get("manager"), Some(&2));
        assert_eq!(stats.sessions_by_role.get("cashier"), Some(&1));
        assert_eq!(stats.expired_sessions, 1);
        assert_eq!(stats.recent_sessions, 3);
    }
}
