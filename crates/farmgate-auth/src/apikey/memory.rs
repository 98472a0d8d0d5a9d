//! In-memory key store for embedding and tests.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{info, warn};

use farmgate_core::result::AppResult;
use farmgate_entity::{ApiKeyRecord, User};

use super::store::KeyStore;

/// In-memory [`KeyStore`] backed by a concurrent map.
///
/// Suitable for single-node embedding and tests. Lookups are counted so
/// cache behaviour can be asserted from the outside.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    /// Records and owners keyed by fingerprint.
    records: DashMap<String, (ApiKeyRecord, User)>,
    /// Number of `find_active` calls served.
    lookups: AtomicU64,
}

impl MemoryKeyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a key record and its owner.
    pub fn insert(&self, record: ApiKeyRecord, user: User) {
        self.records
            .insert(record.fingerprint.clone(), (record, user));
    }

    /// Deactivate a key. Returns `false` when the fingerprint is unknown.
    pub fn revoke(&self, fingerprint: &str) -> bool {
        match self.records.get_mut(fingerprint) {
            Some(mut entry) => {
                entry.0.is_active = false;
                info!(fingerprint, "API key revoked");
                true
            }
            None => false,
        }
    }

    /// Fetch a record and its owner without counting as a lookup.
    pub fn get(&self, fingerprint: &str) -> Option<(ApiKeyRecord, User)> {
        self.records.get(fingerprint).map(|entry| entry.clone())
    }

    /// Number of `find_active` calls served so far.
    pub fn lookup_count(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn find_active(&self, fingerprint: &str) -> AppResult<Option<(ApiKeyRecord, User)>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self.records.get(fingerprint).and_then(|entry| {
            let (record, user) = entry.value();
            record
                .is_active
                .then(|| (record.clone(), user.clone()))
        }))
    }

    async fn record_usage(&self, fingerprint: &str, when: DateTime<Utc>) -> AppResult<()> {
        match self.records.get_mut(fingerprint) {
            Some(mut entry) => {
                entry.0.usage_count += 1;
                entry.0.last_used_at = Some(when);
                Ok(())
            }
            None => {
                warn!(fingerprint, "Usage recorded for unknown fingerprint");
                Ok(())
            }
        }
    }
}
