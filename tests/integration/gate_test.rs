//! Admission decisions across the full pipeline.

use farmgate::RateLimitKind;
use serde_json::Value;

use crate::helpers::{MANAGER_KEY, TestFarm};

#[tokio::test]
async fn manager_reading_pens_is_admitted() {
    let farm = TestFarm::new().await;

    let decision = farm
        .pipeline
        .validate_request(MANAGER_KEY, None, "/api/pens", "read:pens", None)
        .await;

    assert!(decision.authorized);
    assert!(decision.api_key_valid);
    assert!(decision.session_valid);
    assert_eq!(decision.user_id, Some(farm.users.manager));
    assert_eq!(decision.role.as_deref(), Some("manager"));
    assert_eq!(decision.rate_limit, RateLimitKind::Normal);
    assert!(decision.errors.is_empty());

    let context = decision.context.expect("admitted request carries a context");
    assert_eq!(context.user_id, farm.users.manager);
    assert_eq!(context.role, "manager");
    assert_eq!(context.permissions.len(), 5);
}

#[tokio::test]
async fn unknown_key_is_rejected_with_ordered_diagnostics() {
    let farm = TestFarm::new().await;

    let decision = farm
        .pipeline
        .validate_request("no-such-key", None, "/api/pens", "read:pens", None)
        .await;

    assert!(!decision.authorized);
    assert!(!decision.api_key_valid);
    assert_eq!(decision.user_id, None);
    assert_eq!(decision.role, None);
    assert!(decision.context.is_none());
    assert_eq!(
        decision.errors,
        vec![
            "API key validation failed: INVALID_API_KEY: Invalid API key",
            "Authorization skipped due to invalid user context",
        ]
    );
}

#[tokio::test]
async fn permission_outside_the_role_is_denied() {
    let farm = TestFarm::new().await;

    // Cashiers cannot touch pens.
    let decision = farm
        .pipeline
        .validate_request(
            crate::helpers::CASHIER_KEY,
            None,
            "/api/pens",
            "write:pens",
            None,
        )
        .await;

    assert!(!decision.authorized);
    assert!(decision.api_key_valid);
    assert_eq!(
        decision.errors,
        vec!["Authorization failed: Role 'cashier' does not have permission 'write:pens'"]
    );
}

#[tokio::test]
async fn decisions_serialize_for_transport() {
    let farm = TestFarm::new().await;

    let decision = farm
        .pipeline
        .validate_request("no-such-key", None, "/api/pens", "read:pens", None)
        .await;

    let json = serde_json::to_value(&decision).expect("decision serializes");
    assert_eq!(json["authorized"], Value::Bool(false));
    assert_eq!(json["api_key_valid"], Value::Bool(false));
    assert_eq!(json["rate_limit"], "normal");
    assert!(json["errors"].as_array().is_some_and(|e| !e.is_empty()));
}
