//! Rate limiting across the full pipeline.

use farmgate::RateLimitKind;

use crate::helpers::{CASHIER_KEY, MANAGER_KEY, TestFarm};

#[tokio::test]
async fn cashier_is_blocked_on_the_sixth_request_in_the_window() {
    let farm = TestFarm::new().await;

    for _ in 0..5 {
        let decision = farm
            .pipeline
            .validate_request(CASHIER_KEY, None, "/api/deposits", "write:deposits", None)
            .await;
        assert!(decision.authorized);
        assert_eq!(decision.rate_limit, RateLimitKind::Normal);
    }

    let sixth = farm
        .pipeline
        .validate_request(CASHIER_KEY, None, "/api/deposits", "write:deposits", None)
        .await;

    assert!(!sixth.authorized);
    assert!(sixth.api_key_valid);
    assert!(sixth.session_valid);
    assert_eq!(sixth.rate_limit, RateLimitKind::Blocked);
    assert_eq!(sixth.errors, vec!["Rate limit exceeded"]);
    assert!(sixth.context.is_none());
}

#[tokio::test]
async fn one_caller_being_limited_never_affects_another() {
    let farm = TestFarm::new().await;

    for _ in 0..6 {
        farm.pipeline
            .validate_request(CASHIER_KEY, None, "/api/deposits", "write:deposits", None)
            .await;
    }

    // The manager runs under a separate counter and a separate policy.
    let decision = farm
        .pipeline
        .validate_request(MANAGER_KEY, None, "/api/deposits", "read:deposits", None)
        .await;

    assert!(decision.authorized);
    assert_eq!(decision.rate_limit, RateLimitKind::Normal);
}
