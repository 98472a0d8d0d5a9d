//! Periodic session sweep.
//!
//! Removes invalidated and max-expired sessions from the in-memory store so
//! it does not grow without bound. Idle-expired sessions are left in place
//! until validation or the max lifetime catches up with them.

use std::time::Duration;

use async_trait::async_trait;
use farmgate_auth::SessionManager;
use farmgate_core::config::session::SessionConfig;
use farmgate_core::AppResult;

use crate::task::SweepTask;

/// Sweeps dead sessions on the interval configured for session cleanup.
#[derive(Debug)]
pub struct SessionSweep {
    sessions: SessionManager,
    interval: Duration,
}

impl SessionSweep {
    pub fn new(sessions: SessionManager, config: &SessionConfig) -> Self {
        Self {
            sessions,
            interval: Duration::from_secs(config.cleanup_interval_minutes * 60),
        }
    }
}

#[async_trait]
impl SweepTask for SessionSweep {
    fn name(&self) -> &str {
        "session_cleanup"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn sweep(&self) -> AppResult<u64> {
        Ok(self.sessions.cleanup_expired())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration as ChronoDuration, Utc};
    use farmgate_auth::SessionStore;
    use uuid::Uuid;

    use super::*;

    #[tokio::test]
    async fn sweep_reports_how_many_sessions_were_dropped() {
        let store = Arc::new(SessionStore::new());
        let config = SessionConfig::default();
        let manager = SessionManager::new(store.clone(), config.clone());

        let stale = Utc::now() - ChronoDuration::hours(30);
        manager.create_at(stale, Uuid::new_v4(), "user", None, None);
        let live = manager.create(Uuid::new_v4(), "admin", None, None);

        let task = SessionSweep::new(manager, &config);
        assert_eq!(task.sweep().await.unwrap(), 1);
        assert!(store.get(live.id).is_some());
    }

    #[test]
    fn interval_comes_from_the_session_config() {
        let store = Arc::new(SessionStore::new());
        let config = SessionConfig {
            cleanup_interval_minutes: 7,
            ..SessionConfig::default()
        };
        let manager = SessionManager::new(store, config.clone());

        let task = SessionSweep::new(manager, &config);
        assert_eq!(task.interval(), Duration::from_secs(7 * 60));
        assert_eq!(task.name(), "session_cleanup");
    }
}
