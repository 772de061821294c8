use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::health;
use super::state::AppState;
use super::sync;

/// Create the router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .route("/sync", get(sync::run_sync))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::sync::OrgReport;
    use crate::domain::{DomainError, OrgId, PassError, PassReport, SyncError};
    use crate::infrastructure::services::MockSyncTrigger;

    fn router(trigger: MockSyncTrigger) -> Router {
        create_router(AppState::new(Arc::new(trigger)))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_sync_success() {
        let mut trigger = MockSyncTrigger::new();
        trigger
            .expect_trigger()
            .times(1)
            .returning(|| Ok(PassReport::new()));

        let (status, body) = get_json(router(trigger), "/sync").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"data": "success"}));
    }

    #[tokio::test]
    async fn test_sync_aborted() {
        let mut trigger = MockSyncTrigger::new();
        trigger.expect_trigger().times(1).returning(|| {
            Err(PassError::Aborted(SyncError::DirectoryConnectFailed {
                reason: DomainError::directory_connect("connection refused"),
            }))
        });

        let (status, body) = get_json(router(trigger), "/sync").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["data"].as_str().unwrap();
        assert!(message.starts_with("sync error: "));
        assert!(message.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_sync_incomplete() {
        let mut trigger = MockSyncTrigger::new();
        trigger.expect_trigger().times(1).returning(|| {
            let org_id = OrgId::new(2).unwrap();
            let mut org = OrgReport::new(org_id);
            org.record_team_failure(
                "ops",
                SyncError::RemoteCreateFailed {
                    org_id,
                    team: "ops".to_string(),
                    reason: DomainError::remote_status(403, "permission denied"),
                },
            );
            let mut report = PassReport::new();
            report.push(org);
            Err(PassError::Incomplete(report))
        });

        let (status, body) = get_json(router(trigger), "/sync").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            body["data"]
                .as_str()
                .unwrap()
                .starts_with("sync error: sync completed with 1 error(s)")
        );
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let (status, body) = get_json(router(MockSyncTrigger::new()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, _) = get_json(router(MockSyncTrigger::new()), "/live").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _) = get_json(router(MockSyncTrigger::new()), "/teams").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
