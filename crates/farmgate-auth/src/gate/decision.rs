//! Composite admission decision and security status report.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use farmgate_entity::SecurityContext;

use crate::ratelimit::RateLimitKind;
use crate::session::SessionStats;

/// The composite outcome of validating one request.
///
/// Carries every sub-check's verdict plus an ordered diagnostics list;
/// an earlier failure never suppresses a later one. `authorized` is the
/// conjunction the caller acts on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDecision {
    /// Whether the API key was accepted.
    pub api_key_valid: bool,
    /// User resolved from the API key, when valid.
    pub user_id: Option<Uuid>,
    /// Role resolved from the API key, when valid.
    pub role: Option<String>,
    /// Whether the session check passed. `true` when no session was
    /// presented; API-key-only callers need no session.
    pub session_valid: bool,
    /// Whether the request is admitted.
    pub authorized: bool,
    /// Rate-limit standing at check time. Reported `normal` when no
    /// identity was resolved.
    pub rate_limit: RateLimitKind,
    /// Resolved identity and permissions; present only when authorized.
    pub context: Option<SecurityContext>,
    /// Ordered diagnostics: API key, then session, then authorization,
    /// then rate limit.
    pub errors: Vec<String>,
}

impl AccessDecision {
    /// All-invalid decision carrying a single diagnostic, used when the
    /// gate itself fails.
    pub(crate) fn denied(error: impl Into<String>) -> Self {
        Self {
            api_key_valid: false,
            user_id: None,
            role: None,
            session_valid: false,
            authorized: false,
            rate_limit: RateLimitKind::Normal,
            context: None,
            errors: vec![error.into()],
        }
    }
}

/// Point-in-time security posture, for monitoring surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityStatus {
    /// Sessions active and not idle-expired.
    pub active_sessions: u64,
    /// Active session count per role.
    pub sessions_by_role: HashMap<String, u64>,
    /// Whether API key validation is enabled.
    pub api_key_validation_enabled: bool,
    /// Whether session validation is enabled.
    pub session_validation_enabled: bool,
    /// When the report was taken.
    pub timestamp: DateTime<Utc>,
}

impl SecurityStatus {
    pub(crate) fn new(
        stats: SessionStats,
        api_key_validation_enabled: bool,
        session_validation_enabled: bool,
    ) -> Self {
        Self {
            active_sessions: stats.active_sessions,
            sessions_by_role: stats.sessions_by_role,
            api_key_validation_enabled,
            session_validation_enabled,
            timestamp: Utc::now(),
        }
    }
}
