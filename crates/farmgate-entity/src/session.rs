//! Session entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated session with dual expiry.
///
/// The idle expiry slides forward on each refresh; the max expiry is an
/// absolute ceiling fixed at creation that activity cannot extend. Once
/// a session is marked inactive it never becomes active again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// Role the session was authenticated under.
    pub role: String,

    // -- Timestamps --
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
    /// Last validation or refresh timestamp.
    pub last_accessed: DateTime<Utc>,
    /// When the session idle-expires. Advanced by refresh, never past
    /// `max_expires_at`.
    pub idle_expires_at: DateTime<Utc>,
    /// Absolute expiry ceiling fixed at creation.
    pub max_expires_at: DateTime<Utc>,

    /// Whether the session is live. Terminal once false.
    pub is_active: bool,

    // -- Client metadata --
    /// IP address from which the session was created.
    pub ip_address: Option<std::net::IpAddr>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
}

impl Session {
    /// Check whether the session is idle-expired at `now`.
    pub fn is_idle_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.idle_expires_at
    }

    /// Check whether the session is past its absolute ceiling at `now`.
    pub fn is_max_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.max_expires_at
    }

    /// Idle time remaining at `now`. Zero when already expired.
    pub fn idle_remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.idle_expires_at - now).max(Duration::zero())
    }
}
