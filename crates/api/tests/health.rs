//! Health check and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, dead_base, get};
use reelhub_core::service::ServiceName;

#[tokio::test]
async fn health_of_a_service_without_storage_is_ok() {
    let app = build_test_app(ServiceName::Admin, &dead_base().await);
    let response = get(app, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "admin");
    assert!(json["version"].is_string());
    assert!(json.get("db_healthy").is_none());
}

#[tokio::test]
async fn unreachable_database_reports_degraded() {
    let app = build_test_app(ServiceName::Playlist, &dead_base().await);
    let json = body_json(get(app, "/health", None).await).await;

    assert_eq!(json["status"], "degraded");
    assert_eq!(json["service"], "playlist");
    assert_eq!(json["db_healthy"], false);
}

#[tokio::test]
async fn routes_of_other_services_are_not_mounted() {
    let app = build_test_app(ServiceName::Admin, &dead_base().await);
    let response = get(app, "/api/movie/latest-uploads", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_carries_a_request_id() {
    let app = build_test_app(ServiceName::Admin, &dead_base().await);
    let response = get(app, "/health", None).await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}
