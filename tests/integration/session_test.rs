//! Session lifecycle through the pipeline, including expiry reporting.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use farmgate::{
    ApiKeyValidator, MemoryCacheProvider, RateLimit, RbacEnforcer, RoleTable, SecurityGate,
    SessionManager, SessionStore, SlidingWindowLimiter,
};

use crate::helpers::{MANAGER_KEY, TestFarm, farm_config, seeded_store};

/// Gate wired at the component level, exposing the session manager so
/// tests can plant sessions at explicit instants.
fn gate_with_sessions() -> (SecurityGate, SessionManager) {
    let config = farm_config();
    let (store, _) = seeded_store();

    let cache = Arc::new(MemoryCacheProvider::new(&config.cache));
    let validator = ApiKeyValidator::new(store, cache, config.api_key.clone());
    let sessions = SessionManager::new(Arc::new(SessionStore::new()), config.session.clone());
    let limiter: Arc<dyn RateLimit> =
        Arc::new(SlidingWindowLimiter::new(config.rate_limit.clone()));
    let table = RoleTable::from_config(&config.roles).expect("role table builds");
    let enforcer = RbacEnforcer::new(Arc::new(table));

    let gate = SecurityGate::new(validator, sessions.clone(), limiter, enforcer, config);
    (gate, sessions)
}

#[tokio::test]
async fn authenticate_validate_refresh_logout() {
    let farm = TestFarm::new().await;

    let session = farm
        .pipeline
        .authenticate(MANAGER_KEY, None, None)
        .await
        .expect("login succeeds");
    assert_eq!(session.user_id, farm.users.manager);
    assert_eq!(session.role, "manager");

    let decision = farm
        .pipeline
        .validate_request(MANAGER_KEY, Some(session.id), "/api/pens", "read:pens", None)
        .await;
    assert!(decision.authorized);
    assert!(decision.session_valid);

    assert!(farm.pipeline.refresh_session(session.id).is_some());
    assert!(farm.pipeline.logout(session.id));

    let after = farm
        .pipeline
        .validate_request(MANAGER_KEY, Some(session.id), "/api/pens", "read:pens", None)
        .await;
    assert!(!after.authorized);
    assert!(!after.session_valid);
    assert!(
        after
            .errors
            .iter()
            .any(|e| e == "Session validation failed: Session not found")
    );
}

#[tokio::test]
async fn idle_expired_session_reports_the_inactivity_reason() {
    let (gate, sessions) = gate_with_sessions();

    // Idle timeout is two hours; three hours of silence expires it.
    let stale = Utc::now() - Duration::hours(3);
    let session = sessions.create_at(stale, Uuid::new_v4(), "manager", None, None);

    let decision = gate
        .validate_request(MANAGER_KEY, Some(session.id), "/api/pens", "read:pens", None)
        .await;

    assert!(!decision.authorized);
    assert!(decision.api_key_valid);
    assert!(!decision.session_valid);
    assert_eq!(
        decision.errors,
        vec!["Session validation failed: Session expired due to inactivity"]
    );
}

#[tokio::test]
async fn session_past_the_ceiling_reports_the_max_duration_reason() {
    let (gate, sessions) = gate_with_sessions();

    // Past both deadlines; the absolute ceiling wins the diagnosis.
    let stale = Utc::now() - Duration::hours(25);
    let session = sessions.create_at(stale, Uuid::new_v4(), "manager", None, None);

    let decision = gate
        .validate_request(MANAGER_KEY, Some(session.id), "/api/pens", "read:pens", None)
        .await;

    assert!(!decision.session_valid);
    assert_eq!(
        decision.errors,
        vec!["Session validation failed: Session expired due to maximum duration"]
    );
}
