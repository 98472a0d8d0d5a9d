//! Shared test helpers for integration tests.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use farmgate::{AppConfig, MemoryKeyStore, SecurityPipeline};
use farmgate_auth::apikey::fingerprint::fingerprint;
use farmgate_core::config::rate_limit::RateLimitPolicy;
use farmgate_entity::{ApiKeyRecord, User};

/// API key seeded for the farm manager.
pub const MANAGER_KEY: &str = "farm-manager-key";
/// API key seeded for the cashier.
pub const CASHIER_KEY: &str = "farm-cashier-key";

/// Ids of the seeded users.
pub struct FarmUsers {
    pub manager: Uuid,
    pub cashier: Uuid,
}

/// A fully wired pipeline over a seeded in-memory key store.
pub struct TestFarm {
    pub pipeline: SecurityPipeline,
    pub users: FarmUsers,
}

impl TestFarm {
    pub async fn new() -> Self {
        let (store, users) = seeded_store();
        let pipeline = SecurityPipeline::with_store(store, farm_config())
            .await
            .expect("pipeline wiring failed");
        Self { pipeline, users }
    }
}

/// Configuration for a small farm: a manager and a cashier role, with a
/// tight five-requests-per-hour policy for cashiers.
pub fn farm_config() -> AppConfig {
    let mut config = AppConfig::default();

    config.roles.hierarchy = [("cashier".to_string(), 1), ("manager".to_string(), 2)].into();
    config.roles.permissions = [
        (
            "cashier".to_string(),
            vec!["read:deposits".to_string(), "write:deposits".to_string()],
        ),
        (
            "manager".to_string(),
            vec![
                "read:pens".to_string(),
                "write:pens".to_string(),
                "read:deposits".to_string(),
                "write:deposits".to_string(),
                "read:harvests".to_string(),
            ],
        ),
    ]
    .into();

    config.rate_limit.policies = vec![
        RateLimitPolicy {
            name: "cashier_hourly".to_string(),
            applies_to: vec!["cashier".to_string()],
            requests_per_hour: 5,
            window_minutes: 60,
            block_duration_minutes: 15,
        },
        RateLimitPolicy {
            name: "standard".to_string(),
            applies_to: vec!["manager".to_string()],
            requests_per_hour: 1000,
            window_minutes: 60,
            block_duration_minutes: 15,
        },
    ];

    config
}

/// Key store seeded with one manager key and one cashier key.
pub fn seeded_store() -> (Arc<MemoryKeyStore>, FarmUsers) {
    let store = Arc::new(MemoryKeyStore::new());
    let manager = seed_key(&store, MANAGER_KEY, "manager", "Pranee");
    let cashier = seed_key(&store, CASHIER_KEY, "cashier", "Anong");
    (store, FarmUsers { manager, cashier })
}

/// Insert an active key and its owner, returning the owner's id.
pub fn seed_key(store: &MemoryKeyStore, key: &str, role: &str, name: &str) -> Uuid {
    let user_id = Uuid::new_v4();
    store.insert(
        ApiKeyRecord {
            id: Uuid::new_v4(),
            fingerprint: fingerprint(key),
            user_id,
            label: Some(format!("{name} key")),
            role: role.to_string(),
            is_active: true,
            created_at: Utc::now(),
            expires_at: None,
            usage_count: 0,
            last_used_at: None,
        },
        User {
            id: user_id,
            name: name.to_string(),
            role: role.to_string(),
            is_active: true,
        },
    );
    user_id
}
