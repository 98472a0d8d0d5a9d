//! API key validation — fingerprint, cache, store lookup, usage recording.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use uuid::Uuid;

use farmgate_cache::keys;
use farmgate_core::config::api_key::ApiKeyConfig;
use farmgate_core::traits::CacheProvider;

use super::fingerprint::fingerprint;
use super::store::KeyStore;

/// TTL for cached deniable outcomes. Short enough that a corrected key
/// recovers quickly, long enough to blunt repeated invalid-key probing.
const NEGATIVE_CACHE_TTL: Duration = Duration::from_secs(60);

/// Reason an API key was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiKeyDenial {
    /// Validation is globally disabled by configuration.
    ValidationDisabled,
    /// No active record matches the fingerprint.
    UnknownKey,
    /// The key is past its expiry date and expired keys are not allowed.
    Expired,
    /// The owning user account is inactive.
    UserInactive,
    /// The key store failed; the key is treated as invalid (fail closed).
    StoreError,
}

impl ApiKeyDenial {
    /// Stable error code, as surfaced in composite decisions.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationDisabled => "VALIDATION_DISABLED",
            Self::UnknownKey => "INVALID_API_KEY",
            Self::Expired => "API_KEY_EXPIRED",
            Self::UserInactive => "USER_INACTIVE",
            Self::StoreError => "VALIDATION_ERROR",
        }
    }

    /// Human-readable denial message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::ValidationDisabled => "API key validation is not enabled",
            Self::UnknownKey => "Invalid API key",
            Self::Expired => "API key has expired",
            Self::UserInactive => "User account is inactive",
            Self::StoreError => "API key validation failed internally",
        }
    }
}

impl fmt::Display for ApiKeyDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// Outcome of validating an API key.
///
/// Serializable because positive and deniable outcomes are cached as
/// JSON under the key's fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ApiKeyOutcome {
    /// The key is valid and maps to an active user.
    Valid {
        /// Owning user.
        user_id: Uuid,
        /// Role granted by the key.
        role: String,
        /// Key expiry, if any.
        expires_at: Option<DateTime<Utc>>,
    },
    /// The key was rejected.
    Denied {
        /// Why the key was rejected.
        reason: ApiKeyDenial,
    },
}

impl ApiKeyOutcome {
    /// Whether the outcome admits the key.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// TTL this outcome may be cached with, or `None` for uncacheable
    /// outcomes (disabled validation, store failures).
    fn cache_ttl(&self, positive_ttl: Duration) -> Option<Duration> {
        match self {
            Self::Valid { .. } => Some(positive_ttl),
            Self::Denied { reason } => match reason {
                ApiKeyDenial::UnknownKey | ApiKeyDenial::Expired | ApiKeyDenial::UserInactive => {
                    Some(NEGATIVE_CACHE_TTL)
                }
                ApiKeyDenial::ValidationDisabled | ApiKeyDenial::StoreError => None,
            },
        }
    }
}

/// Validates API keys against the durable store, with result caching.
#[derive(Clone)]
pub struct ApiKeyValidator {
    /// Durable key/user store adapter.
    store: Arc<dyn KeyStore>,
    /// Validation result cache.
    cache: Arc<dyn CacheProvider>,
    /// Validation configuration.
    config: ApiKeyConfig,
}

impl fmt::Debug for ApiKeyValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyValidator")
            .field("config", &self.config)
            .finish()
    }
}

impl ApiKeyValidator {
    /// Creates a new validator over a key store and a result cache.
    pub fn new(
        store: Arc<dyn KeyStore>,
        cache: Arc<dyn CacheProvider>,
        config: ApiKeyConfig,
    ) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// Validates an API key end to end:
    ///
    /// 1. Bail out if validation is globally disabled
    /// 2. Fingerprint the key and consult the cache
    /// 3. Resolve the fingerprint through the key store
    /// 4. Reject unknown keys, expired keys, and inactive owners
    /// 5. Record usage (best-effort) and cache the outcome
    ///
    /// Store failures fail closed as a `StoreError` denial; cache
    /// failures are absorbed and treated as misses.
    pub async fn validate(&self, key: &str) -> ApiKeyOutcome {
        if !self.config.enable_validation {
            warn!("API key validation is disabled in configuration");
            return ApiKeyOutcome::Denied {
                reason: ApiKeyDenial::ValidationDisabled,
            };
        }

        let fp = fingerprint(key);
        let cache_key = keys::api_key(&fp);

        if let Some(outcome) = self.cached_outcome(&cache_key).await {
            debug!("API key validation served from cache");
            return outcome;
        }

        let outcome = self.validate_uncached(&fp).await;
        self.cache_outcome(&cache_key, &outcome).await;
        outcome
    }

    /// Resolve the `(user_id, role)` behind a key, if it is valid.
    ///
    /// Goes through [`validate`](Self::validate), so it shares the cache.
    pub async fn get_user_info(&self, key: &str) -> Option<(Uuid, String)> {
        match self.validate(key).await {
            ApiKeyOutcome::Valid { user_id, role, .. } => Some((user_id, role)),
            ApiKeyOutcome::Denied { .. } => None,
        }
    }

    /// Check whether a key is past its expiry date.
    ///
    /// Queries the store directly, bypassing the cache. Unknown keys and
    /// store failures read as expired (fail safe).
    pub async fn is_expired(&self, key: &str) -> bool {
        let fp = fingerprint(key);
        match self.store.find_active(&fp).await {
            Ok(Some((record, _))) => record.is_expired(Utc::now()),
            Ok(None) => true,
            Err(e) => {
                warn!(error = %e, "Key store lookup failed during expiry check");
                true
            }
        }
    }

    /// Store-backed validation, cache already missed.
    async fn validate_uncached(&self, fp: &str) -> ApiKeyOutcome {
        let (record, user) = match self.store.find_active(fp).await {
            Ok(Some(found)) => found,
            Ok(None) => {
                warn!("Unknown or inactive API key presented");
                return ApiKeyOutcome::Denied {
                    reason: ApiKeyDenial::UnknownKey,
                };
            }
            Err(e) => {
                error!(error = %e, "Key store lookup failed");
                return ApiKeyOutcome::Denied {
                    reason: ApiKeyDenial::StoreError,
                };
            }
        };

        let now = Utc::now();

        if record.is_expired(now) && !self.config.allow_expired {
            warn!(user_id = %record.user_id, "Expired API key rejected");
            return ApiKeyOutcome::Denied {
                reason: ApiKeyDenial::Expired,
            };
        }

        if !user.is_active {
            warn!(user_id = %user.id, user_name = %user.name, "API key of inactive user rejected");
            return ApiKeyOutcome::Denied {
                reason: ApiKeyDenial::UserInactive,
            };
        }

        // Usage statistics are best-effort: a failed write must never
        // fail the validation itself.
        if let Err(e) = self.store.record_usage(fp, now).await {
            warn!(user_id = %user.id, error = %e, "Failed to record API key usage");
        }

        debug!(user_id = %user.id, role = %record.role, "API key validated");

        ApiKeyOutcome::Valid {
            user_id: record.user_id,
            role: record.role,
            expires_at: record.expires_at,
        }
    }

    async fn cached_outcome(&self, cache_key: &str) -> Option<ApiKeyOutcome> {
        if self.config.cache_minutes == 0 {
            return None;
        }
        match self.cache.get(cache_key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    warn!(error = %e, "Dropping undecodable cached validation result");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Validation cache read failed");
                None
            }
        }
    }

    async fn cache_outcome(&self, cache_key: &str, outcome: &ApiKeyOutcome) {
        if self.config.cache_minutes == 0 {
            return;
        }
        let positive_ttl = Duration::from_secs(self.config.cache_minutes * 60);
        let Some(ttl) = outcome.cache_ttl(positive_ttl) else {
            return;
        };
        match serde_json::to_string(outcome) {
            Ok(json) => {
                if let Err(e) = self.cache.set(cache_key, &json, ttl).await {
                    warn!(error = %e, "Validation cache write failed");
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to encode validation result for caching");
            }
        }
    }
}
