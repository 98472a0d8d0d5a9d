//! Pipeline wiring.
//!
//! [`SecurityPipeline`] builds every security component from configuration,
//! composes them into a [`SecurityGate`], and keeps the background sweepers
//! running until shutdown.

use std::net::IpAddr;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use farmgate_auth::{
    AccessDecision, ApiKeyValidator, KeyStore, MemoryKeyStore, RateLimit, RbacEnforcer, RoleTable,
    SecurityGate, SecurityStatus, SessionManager, SessionStore, SlidingWindowLimiter,
};
use farmgate_cache::MemoryCacheProvider;
use farmgate_core::config::AppConfig;
use farmgate_core::AppResult;
use farmgate_entity::Session;
use farmgate_worker::{RateLimitSweep, SessionSweep, SweepRunner};

/// The assembled request-security pipeline.
///
/// Owns the security gate and the background sweepers. Construction wires
/// every component from [`AppConfig`]; [`shutdown`](Self::shutdown) stops
/// the sweepers and waits for them to finish.
#[derive(Debug)]
pub struct SecurityPipeline {
    gate: SecurityGate,
    sweeper: SweepRunner,
}

impl SecurityPipeline {
    /// Build a pipeline with an empty in-memory key store.
    ///
    /// Embedders backed by a real key store use
    /// [`with_store`](Self::with_store).
    pub async fn new(config: AppConfig) -> AppResult<Self> {
        Self::with_store(Arc::new(MemoryKeyStore::new()), config).await
    }

    /// Build a pipeline over a caller-provided key store adapter.
    pub async fn with_store(store: Arc<dyn KeyStore>, config: AppConfig) -> AppResult<Self> {
        // Step 1: validation cache.
        let cache = Arc::new(MemoryCacheProvider::new(&config.cache));

        // Step 2: API key validator.
        let validator = ApiKeyValidator::new(store, cache, config.api_key.clone());

        // Step 3: session manager over a shared store.
        let sessions = SessionManager::new(Arc::new(SessionStore::new()), config.session.clone());

        // Step 4: rate limiter.
        let limiter = Arc::new(SlidingWindowLimiter::new(config.rate_limit.clone()));

        // Step 5: role table and enforcer. A malformed permission table
        // fails wiring here instead of surfacing per request.
        let table = RoleTable::from_config(&config.roles)?;
        let enforcer = RbacEnforcer::new(Arc::new(table));

        // Step 6: compose the gate.
        let rate_limit: Arc<dyn RateLimit> = limiter.clone();
        let gate = SecurityGate::new(
            validator,
            sessions.clone(),
            rate_limit,
            enforcer,
            config.clone(),
        );

        // Step 7: background sweepers.
        let mut sweeper = SweepRunner::new();
        sweeper.spawn(Arc::new(SessionSweep::new(sessions, &config.session)));
        sweeper.spawn(Arc::new(RateLimitSweep::new(limiter, &config.rate_limit)));

        info!(sweepers = sweeper.task_count(), "Security pipeline initialized");
        Ok(Self { gate, sweeper })
    }

    /// Validate one inbound request end to end.
    pub async fn validate_request(
        &self,
        api_key: &str,
        session_id: Option<Uuid>,
        endpoint: &str,
        required_permission: &str,
        ip_address: Option<IpAddr>,
    ) -> AccessDecision {
        self.gate
            .validate_request(api_key, session_id, endpoint, required_permission, ip_address)
            .await
    }

    /// Log a user in: validate the API key and open a session.
    pub async fn authenticate(
        &self,
        api_key: &str,
        ip_address: Option<IpAddr>,
        user_agent: Option<String>,
    ) -> AppResult<Session> {
        self.gate.authenticate(api_key, ip_address, user_agent).await
    }

    /// Slide a session's idle deadline forward.
    pub fn refresh_session(&self, session_id: Uuid) -> Option<Session> {
        self.gate.refresh_session(session_id)
    }

    /// Log a session out. Idempotent.
    pub fn logout(&self, session_id: Uuid) -> bool {
        self.gate.logout(session_id)
    }

    /// Point-in-time security posture for monitoring surfaces.
    pub fn security_status(&self) -> SecurityStatus {
        self.gate.security_status()
    }

    /// Stop the sweepers and wait for them to finish.
    pub async fn shutdown(self) {
        self.sweeper.shutdown().await;
        info!("Security pipeline shut down");
    }
}
