//! Key store adapter trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use farmgate_core::result::AppResult;
use farmgate_entity::{ApiKeyRecord, User};

/// Adapter to the durable key/user store.
///
/// The pipeline holds no key material of its own: fingerprints are
/// resolved through this trait, and usage statistics are written back
/// after successful validations. Implementations must be thread-safe;
/// this is the only pipeline operation allowed to block on network I/O.
#[async_trait]
pub trait KeyStore: Send + Sync + std::fmt::Debug + 'static {
    /// Resolve an active key record and its owning user by fingerprint.
    ///
    /// Returns `None` when no active record matches; revoked keys are
    /// absent by contract, not surfaced as inactive records. Expiry and
    /// owner status are judged by the caller, not filtered here.
    async fn find_active(&self, fingerprint: &str) -> AppResult<Option<(ApiKeyRecord, User)>>;

    /// Record a successful validation against the key's usage statistics.
    ///
    /// Best-effort from the caller's point of view: a validation outcome
    /// never depends on this call succeeding.
    async fn record_usage(&self, fingerprint: &str, when: DateTime<Utc>) -> AppResult<()>;
}
