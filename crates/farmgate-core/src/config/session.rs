//! Session management configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Whether session validation is enabled. When disabled, every
    /// validation call reports the session as invalid.
    #[serde(default = "default_true")]
    pub enable_validation: bool,
    /// Idle timeout in hours. Each refresh slides the idle expiry
    /// forward by this amount, capped by the absolute maximum.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_hours: u64,
    /// Absolute session lifetime in hours, regardless of activity.
    #[serde(default = "default_max_duration")]
    pub max_duration_hours: u64,
    /// Interval for expired session cleanup in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enable_validation: true,
            idle_timeout_hours: default_idle_timeout(),
            max_duration_hours: default_max_duration(),
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_idle_timeout() -> u64 {
    2
}

fn default_max_duration() -> u64 {
    24
}

fn default_cleanup_interval() -> u64 {
    15
}
