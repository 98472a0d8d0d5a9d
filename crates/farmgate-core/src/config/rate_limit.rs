//! Rate limiting configuration.

use serde::{Deserialize, Serialize};

/// Rate limiting configuration: the policy list plus sweep cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Interval for the idle-counter sweep in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
    /// Ordered policy list. A request is governed by the first policy
    /// whose `applies_to` list contains the caller's role; roles matching
    /// no policy are not rate limited at all.
    #[serde(default = "default_policies")]
    pub policies: Vec<RateLimitPolicy>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            cleanup_interval_minutes: default_cleanup_interval(),
            policies: default_policies(),
        }
    }
}

/// A single named rate-limit policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    /// Policy name, echoed in rate-limit status reports.
    pub name: String,
    /// Roles this policy applies to.
    #[serde(default)]
    pub applies_to: Vec<String>,
    /// Request ceiling per window.
    #[serde(default = "default_requests_per_hour")]
    pub requests_per_hour: u32,
    /// Sliding window length in minutes.
    #[serde(default = "default_window_minutes")]
    pub window_minutes: u64,
    /// How long a caller stays blocked after exceeding the ceiling.
    #[serde(default = "default_block_duration")]
    pub block_duration_minutes: u64,
}

fn default_cleanup_interval() -> u64 {
    5
}

fn default_requests_per_hour() -> u32 {
    1000
}

fn default_window_minutes() -> u64 {
    60
}

fn default_block_duration() -> u64 {
    15
}

fn default_policies() -> Vec<RateLimitPolicy> {
    vec![RateLimitPolicy {
        name: "standard".to_string(),
        applies_to: vec!["user".to_string(), "admin".to_string()],
        requests_per_hour: default_requests_per_hour(),
        window_minutes: default_window_minutes(),
        block_duration_minutes: default_block_duration(),
    }]
}
