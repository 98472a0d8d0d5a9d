//! API key record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored API key, identified by the fingerprint of its secret.
///
/// Records are created and revoked by the external key store; the
/// validator only reads them and bumps the usage fields on successful
/// lookups. The raw secret is never stored, only its fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// Base64-encoded SHA-256 fingerprint of the key secret.
    pub fingerprint: String,
    /// The user this key belongs to.
    pub user_id: Uuid,
    /// Human-readable label ("mobile app", "reporting job", ...).
    pub label: Option<String>,
    /// Role granted by this key, snapshotted at issue time.
    pub role: String,

    // -- Lifecycle --
    /// Whether the key is currently usable. Revocation flips this off.
    pub is_active: bool,
    /// When the key was issued.
    pub created_at: DateTime<Utc>,
    /// Optional expiry date. `None` means the key never expires.
    pub expires_at: Option<DateTime<Utc>>,

    // -- Usage statistics --
    /// Number of successful store-backed validations.
    pub usage_count: i64,
    /// Timestamp of the most recent successful validation.
    pub last_used_at: Option<DateTime<Utc>>,
}

impl ApiKeyRecord {
    /// Check whether the key is past its expiry date at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}
