//! Pipeline wiring and lifecycle.

use farmgate::{ErrorKind, SecurityPipeline};

use crate::helpers::{CASHIER_KEY, MANAGER_KEY, TestFarm, farm_config};

#[tokio::test]
async fn pipeline_reports_status_and_shuts_down_cleanly() {
    let farm = TestFarm::new().await;

    farm.pipeline
        .authenticate(MANAGER_KEY, None, None)
        .await
        .expect("manager login");
    let cashier_session = farm
        .pipeline
        .authenticate(CASHIER_KEY, None, None)
        .await
        .expect("cashier login");
    assert_eq!(cashier_session.user_id, farm.users.cashier);

    let status = farm.pipeline.security_status();
    assert_eq!(status.active_sessions, 2);
    assert_eq!(status.sessions_by_role.get("manager"), Some(&1));
    assert_eq!(status.sessions_by_role.get("cashier"), Some(&1));
    assert!(status.api_key_validation_enabled);
    assert!(status.session_validation_enabled);

    farm.pipeline.shutdown().await;
}

#[tokio::test]
async fn malformed_permission_table_fails_wiring() {
    let mut config = farm_config();
    config
        .roles
        .permissions
        .insert("intern".to_string(), vec!["readpens".to_string()]);

    let err = SecurityPipeline::new(config).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Configuration);
}

#[tokio::test]
async fn authentication_with_an_unknown_key_is_an_error() {
    let farm = TestFarm::new().await;

    let err = farm
        .pipeline
        .authenticate("no-such-key", None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(err.message, "INVALID_API_KEY: Invalid API key");
}
