//! Sliding-window rate limiter keyed by `(user, role)`.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use farmgate_core::config::rate_limit::{RateLimitConfig, RateLimitPolicy};

/// Counters idle this long and not blocked are dropped by the sweep.
const IDLE_HORIZON_HOURS: i64 = 2;

/// Rate-limit standing of a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitKind {
    /// Budget comfortably available.
    Normal,
    /// Ten percent or less of the budget remains.
    Warning,
    /// Budget exhausted or a blocking penalty is in force.
    Blocked,
}

impl RateLimitKind {
    /// Lowercase status name as used in composite decisions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for RateLimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rate-limit status for one `(user, role)` under its governing policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitStatus {
    /// Current standing.
    pub kind: RateLimitKind,
    /// Name of the governing policy. `None` when the role matches no
    /// policy, in which case the caller is not rate limited and the
    /// numeric fields are zero.
    pub policy_name: Option<String>,
    /// Requests left in the current window.
    pub remaining: u32,
    /// Request ceiling per window.
    pub limit: u32,
    /// When the current window ends.
    pub window_reset: DateTime<Utc>,
    /// End of the blocking penalty, while one is in force.
    pub blocked_until: Option<DateTime<Utc>>,
}

impl RateLimitStatus {
    /// Whether the caller is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.kind == RateLimitKind::Blocked
    }

    /// Status for a role no policy applies to.
    fn unlimited(now: DateTime<Utc>) -> Self {
        Self {
            kind: RateLimitKind::Normal,
            policy_name: None,
            remaining: 0,
            limit: 0,
            window_reset: now,
            blocked_until: None,
        }
    }
}

/// Admission pre-check and usage recording, the two limiter operations
/// the security gate consumes.
///
/// `check` must never consume budget; `record` bills one request and is
/// only called for admitted requests.
pub trait RateLimit: Send + Sync + std::fmt::Debug + 'static {
    /// Read-only admission pre-check for `(user_id, role)`.
    fn check(&self, user_id: Uuid, endpoint: &str, role: &str) -> RateLimitStatus;

    /// Bill one request against `(user_id, role)`.
    fn record(&self, user_id: Uuid, endpoint: &str, role: &str) -> RateLimitStatus;
}

/// Per-key sliding window state.
#[derive(Debug, Default)]
struct Counter {
    /// Request timestamps inside the current window, oldest first.
    timestamps: Vec<DateTime<Utc>>,
    /// Whether a blocking penalty is in force.
    is_blocked: bool,
    /// End of the blocking penalty.
    blocked_until: Option<DateTime<Utc>>,
}

/// Sliding-window rate limiter with a blocking penalty.
///
/// One counter per `(user, role)`; the same user may carry different
/// ceilings under different role grants. Check and record for one key
/// run under that key's map-entry lock, so the window arithmetic is
/// derived once per call and two concurrent records for the same key
/// serialize. The limiter fails open: a role that resolves to no policy
/// is simply not throttled.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    /// `(user, role)` → window state
    counters: DashMap<String, Counter>,
    /// Policy list and sweep cadence.
    config: RateLimitConfig,
}

impl SlidingWindowLimiter {
    /// Creates a limiter from the configured policy list.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            counters: DashMap::new(),
            config,
        }
    }

    /// Admission pre-check as of an explicit instant.
    ///
    /// Purges stale timestamps and clears an expired block (resetting
    /// the counted window), but never appends to the history.
    pub fn check_at(
        &self,
        now: DateTime<Utc>,
        user_id: Uuid,
        endpoint: &str,
        role: &str,
    ) -> RateLimitStatus {
        let Some(policy) = self.policy_for(role) else {
            debug!(user_id = %user_id, role, "No rate limit policy applies");
            return RateLimitStatus::unlimited(now);
        };

        let mut entry = self.counters.entry(counter_key(user_id, role)).or_default();
        let counter = entry.value_mut();

        refresh_window(counter, now, policy);

        if counter.is_blocked {
            debug!(user_id = %user_id, role, endpoint, "Request denied by active rate limit block");
            return Self::status(policy, now, RateLimitKind::Blocked, 0, counter.blocked_until);
        }

        let count = counter.timestamps.len() as u32;
        let remaining = policy.requests_per_hour.saturating_sub(count);
        Self::status(policy, now, Self::kind_for(policy, remaining), remaining, None)
    }

    /// Bill one request as of an explicit instant.
    ///
    /// Appends to the window history; when the resulting count exceeds
    /// the ceiling, the key is blocked for the policy's block duration.
    pub fn record_at(
        &self,
        now: DateTime<Utc>,
        user_id: Uuid,
        endpoint: &str,
        role: &str,
    ) -> RateLimitStatus {
        let Some(policy) = self.policy_for(role) else {
            debug!(user_id = %user_id, role, "No rate limit policy applies");
            return RateLimitStatus::unlimited(now);
        };

        let mut entry = self.counters.entry(counter_key(user_id, role)).or_default();
        let counter = entry.value_mut();

        refresh_window(counter, now, policy);
        counter.timestamps.push(now);

        let count = counter.timestamps.len() as u32;
        if count > policy.requests_per_hour {
            let until = now + Duration::minutes(policy.block_duration_minutes as i64);
            counter.is_blocked = true;
            counter.blocked_until = Some(until);

            warn!(
                user_id = %user_id,
                role,
                endpoint,
                requests = count,
                blocked_until = %until,
                "Rate limit exceeded, blocking"
            );
            return Self::status(policy, now, RateLimitKind::Blocked, 0, Some(until));
        }

        let remaining = policy.requests_per_hour.saturating_sub(count);
        let kind = if remaining.saturating_mul(10) <= policy.requests_per_hour {
            RateLimitKind::Warning
        } else {
            RateLimitKind::Normal
        };
        Self::status(policy, now, kind, remaining, None)
    }

    /// Drop counters idle beyond the horizon and clear expired blocks.
    pub fn sweep(&self) -> u64 {
        self.sweep_at(Utc::now())
    }

    /// Sweep as of an explicit instant, returning how many counters
    /// were dropped.
    pub fn sweep_at(&self, now: DateTime<Utc>) -> u64 {
        let horizon = now - Duration::hours(IDLE_HORIZON_HOURS);
        let mut removed = 0u64;

        self.counters.retain(|_, counter| {
            if counter.is_blocked && counter.blocked_until.is_some_and(|until| until <= now) {
                counter.is_blocked = false;
                counter.blocked_until = None;
                counter.timestamps.clear();
            }
            counter.timestamps.retain(|t| *t >= horizon);

            if counter.timestamps.is_empty() && !counter.is_blocked {
                removed += 1;
                false
            } else {
                true
            }
        });

        if removed > 0 {
            debug!(removed, "Swept idle rate limit counters");
        }
        removed
    }

    /// First configured policy whose `applies_to` contains the role.
    fn policy_for(&self, role: &str) -> Option<&RateLimitPolicy> {
        self.config
            .policies
            .iter()
            .find(|p| p.applies_to.iter().any(|r| r == role))
    }

    fn kind_for(policy: &RateLimitPolicy, remaining: u32) -> RateLimitKind {
        if remaining == 0 {
            RateLimitKind::Blocked
        } else if remaining.saturating_mul(10) <= policy.requests_per_hour {
            RateLimitKind::Warning
        } else {
            RateLimitKind::Normal
        }
    }

    fn status(
        policy: &RateLimitPolicy,
        now: DateTime<Utc>,
        kind: RateLimitKind,
        remaining: u32,
        blocked_until: Option<DateTime<Utc>>,
    ) -> RateLimitStatus {
        RateLimitStatus {
            kind,
            policy_name: Some(policy.name.clone()),
            remaining,
            limit: policy.requests_per_hour,
            window_reset: now + Duration::minutes(policy.window_minutes as i64),
            blocked_until,
        }
    }
}

impl RateLimit for SlidingWindowLimiter {
    fn check(&self, user_id: Uuid, endpoint: &str, role: &str) -> RateLimitStatus {
        self.check_at(Utc::now(), user_id, endpoint, role)
    }

    fn record(&self, user_id: Uuid, endpoint: &str, role: &str) -> RateLimitStatus {
        self.record_at(Utc::now(), user_id, endpoint, role)
    }
}

fn counter_key(user_id: Uuid, role: &str) -> String {
    format!("{user_id}:{role}")
}

/// Bring a counter up to date at `now`: clear an expired block (which
/// resets the counted window) and purge timestamps that slid out.
fn refresh_window(counter: &mut Counter, now: DateTime<Utc>, policy: &RateLimitPolicy) {
    if counter.is_blocked && counter.blocked_until.is_some_and(|until| until <= now) {
        counter.is_blocked = false;
        counter.blocked_until = None;
        counter.timestamps.clear();
    }

    let window_start = now - Duration::minutes(policy.window_minutes as i64);
    counter.timestamps.retain(|t| *t >= window_start);
}
