//! API key validation configuration.

use serde::{Deserialize, Serialize};

/// API key validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyConfig {
    /// Whether API key validation is enabled. When disabled, every
    /// validation call is denied with a `VALIDATION_DISABLED` outcome.
    #[serde(default = "default_true")]
    pub enable_validation: bool,
    /// TTL in minutes for cached positive validation results.
    /// A value of `0` disables the validation cache entirely.
    #[serde(default = "default_cache_minutes")]
    pub cache_minutes: u64,
    /// Whether keys past their expiry date are still accepted.
    #[serde(default)]
    pub allow_expired: bool,
}

impl Default for ApiKeyConfig {
    fn default() -> Self {
        Self {
            enable_validation: true,
            cache_minutes: default_cache_minutes(),
            allow_expired: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cache_minutes() -> u64 {
    5
}
