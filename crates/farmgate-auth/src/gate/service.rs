//! The orchestrating security gate.

use std::net::IpAddr;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use farmgate_core::config::AppConfig;
use farmgate_core::{AppError, AppResult};
use farmgate_entity::{Permission, SecurityContext, Session};

use crate::apikey::{ApiKeyOutcome, ApiKeyValidator};
use crate::ratelimit::{RateLimit, RateLimitKind};
use crate::rbac::RbacEnforcer;
use crate::session::{SessionManager, SessionOutcome};

use super::decision::{AccessDecision, SecurityStatus};

/// Composes the API key validator, session manager, rate limiter, and
/// RBAC enforcer into one admission decision per request.
///
/// Authentication and authorization fail closed; rate limiting fails
/// open. The gate never bills a rate budget for a request it denies.
#[derive(Debug, Clone)]
pub struct SecurityGate {
    /// API key validator.
    validator: ApiKeyValidator,
    /// Session lifecycle manager.
    sessions: SessionManager,
    /// Rate limiter seam.
    limiter: Arc<dyn RateLimit>,
    /// Permission enforcement.
    enforcer: RbacEnforcer,
    /// Full configuration, for the status report.
    config: AppConfig,
}

impl SecurityGate {
    /// Creates a gate over the four pipeline components.
    pub fn new(
        validator: ApiKeyValidator,
        sessions: SessionManager,
        limiter: Arc<dyn RateLimit>,
        enforcer: RbacEnforcer,
        config: AppConfig,
    ) -> Self {
        Self {
            validator,
            sessions,
            limiter,
            enforcer,
            config,
        }
    }

    /// Validate one inbound request end to end:
    ///
    /// 1. Validate the API key (always)
    /// 2. Validate the session, when one is presented
    /// 3. Check the required permission against the resolved identity
    /// 4. Pre-check the rate limit for the resolved identity
    /// 5. Admit only if every check passed
    /// 6. On admission, build the security context and bill the request
    ///
    /// Every sub-check's failure lands in the decision's ordered error
    /// list; an earlier failure never suppresses a later one. An
    /// internal failure inside the gate collapses to an all-invalid
    /// decision with a single generic diagnostic.
    pub async fn validate_request(
        &self,
        api_key: &str,
        session_id: Option<Uuid>,
        endpoint: &str,
        required_permission: &str,
        ip_address: Option<IpAddr>,
    ) -> AccessDecision {
        match self
            .evaluate(api_key, session_id, endpoint, required_permission, ip_address)
            .await
        {
            Ok(decision) => decision,
            Err(e) => {
                error!(endpoint, error = %e, "Security validation failed unexpectedly");
                AccessDecision::denied("Security validation failed due to unexpected error")
            }
        }
    }

    async fn evaluate(
        &self,
        api_key: &str,
        session_id: Option<Uuid>,
        endpoint: &str,
        required_permission: &str,
        ip_address: Option<IpAddr>,
    ) -> AppResult<AccessDecision> {
        let required = Permission::parse(required_permission)?;
        let mut errors = Vec::new();

        debug!(endpoint, permission = %required, "Validating request");

        // Step 1: validate the API key.
        let key_outcome = self.validator.validate(api_key).await;
        let api_key_valid = key_outcome.is_valid();
        if let ApiKeyOutcome::Denied { reason } = &key_outcome {
            errors.push(format!("API key validation failed: {reason}"));
            warn!(endpoint, code = reason.code(), "API key validation failed");
        }
        let identity = match &key_outcome {
            ApiKeyOutcome::Valid { user_id, role, .. } => Some((*user_id, role.clone())),
            ApiKeyOutcome::Denied { .. } => None,
        };

        // Step 2: validate the session when one is presented. Callers
        // without a session are API-key-only and pass by default.
        let session_valid = match session_id {
            Some(id) => {
                let outcome = self.sessions.validate(id);
                if let SessionOutcome::Invalid { reason } = &outcome {
                    errors.push(format!("Session validation failed: {reason}"));
                    warn!(session_id = %id, reason = %reason, "Session validation failed");
                }
                outcome.is_valid()
            }
            None => true,
        };

        // Step 3: authorization needs a fully trusted identity; a
        // partially trusted one is never checked.
        let authorization_valid = match &identity {
            Some((user_id, role)) => {
                let outcome = self.enforcer.check_permission(*user_id, role, &required);
                if let Some(message) = &outcome.message {
                    errors.push(format!("Authorization failed: {message}"));
                }
                outcome.granted
            }
            None => {
                errors.push("Authorization skipped due to invalid user context".to_string());
                false
            }
        };

        // Step 4: rate-limit pre-check for the resolved identity. This
        // never consumes budget.
        let rate_limit = match &identity {
            Some((user_id, role)) => {
                let status = self.limiter.check(*user_id, endpoint, role);
                if status.is_blocked() {
                    errors.push(match status.blocked_until {
                        Some(until) => format!("Rate limit exceeded: blocked until {until}"),
                        None => "Rate limit exceeded".to_string(),
                    });
                    warn!(user_id = %user_id, endpoint, "Rate limit exceeded");
                }
                status.kind
            }
            None => RateLimitKind::Normal,
        };

        // Step 5: every gate must pass.
        let authorized = api_key_valid
            && session_valid
            && authorization_valid
            && rate_limit != RateLimitKind::Blocked;

        // Step 6: build the context and bill the admitted request.
        // Denied requests never consume rate budget.
        let context = match (&identity, authorized) {
            (Some((user_id, role)), true) => {
                let context = SecurityContext {
                    user_id: *user_id,
                    role: role.clone(),
                    permissions: self.enforcer.permissions_for(role).to_vec(),
                    session_id,
                    ip_address,
                    request_time: Utc::now(),
                };
                let _ = self.limiter.record(*user_id, endpoint, role);
                debug!(user_id = %user_id, role, endpoint, "Request admitted");
                Some(context)
            }
            _ => None,
        };

        Ok(AccessDecision {
            api_key_valid,
            user_id: identity.as_ref().map(|(id, _)| *id),
            role: identity.map(|(_, role)| role),
            session_valid,
            authorized,
            rate_limit,
            context,
            errors,
        })
    }

    /// Log a user in: validate the API key and open a session.
    pub async fn authenticate(
        &self,
        api_key: &str,
        ip_address: Option<IpAddr>,
        user_agent: Option<String>,
    ) -> AppResult<Session> {
        match self.validator.validate(api_key).await {
            ApiKeyOutcome::Valid { user_id, role, .. } => {
                let session = self.sessions.create(user_id, &role, ip_address, user_agent);
                info!(user_id = %user_id, role, session_id = %session.id, "Authentication successful");
                Ok(session)
            }
            ApiKeyOutcome::Denied { reason } => {
                warn!(code = reason.code(), "Authentication failed");
                Err(AppError::authentication(reason.to_string()))
            }
        }
    }

    /// Slide a session's idle deadline forward.
    pub fn refresh_session(&self, session_id: Uuid) -> Option<Session> {
        self.sessions.refresh(session_id)
    }

    /// Log a session out. Idempotent.
    pub fn logout(&self, session_id: Uuid) -> bool {
        self.sessions.invalidate(session_id)
    }

    /// Point-in-time security posture for monitoring surfaces.
    pub fn security_status(&self) -> SecurityStatus {
        SecurityStatus::new(
            self.sessions.stats(),
            self.config.api_key.enable_validation,
            self.config.session.enable_validation,
        )
    }
}
