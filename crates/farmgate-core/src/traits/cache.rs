//! Cache provider trait for pluggable caching backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for validation-cache backends.
///
/// All values are serialized as strings (JSON) by the caller; the cache
/// provider is responsible for TTL enforcement.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a per-entry TTL.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;
}
