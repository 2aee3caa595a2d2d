//! Admin service against stub sibling services.

mod common;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use common::{body_json, build_test_app, principal, spawn, token_for, UserStub};
use reelhub_core::activity::{ActivityAction, ActivityLogEntry};
use reelhub_core::service::ServiceName;
use serde_json::json;

fn count_route(service: &str, count: i64) -> Router {
    Router::new().route(
        &format!("/api/{service}/internal/count"),
        get(move || async move { Json(json!({ "count": count })) }),
    )
}

fn log_route(service: ServiceName, entries: Vec<ActivityLogEntry>) -> Router {
    Router::new().route(
        &format!("/api/{service}/internal/activity-logs"),
        get(move || {
            let entries = entries.clone();
            async move { Json(entries) }
        }),
    )
}

fn entry(
    service: ServiceName,
    id: i64,
    user: i64,
    action: ActivityAction,
    minute: u32,
) -> ActivityLogEntry {
    ActivityLogEntry {
        id,
        service,
        user: Some(user),
        action,
        details: None,
        ip: None,
        user_agent: None,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
    }
}

fn users() -> UserStub {
    UserStub::new(vec![principal(1, "admin"), principal(2, "user")])
}

#[tokio::test]
async fn app_info_collects_all_four_counts() {
    let stub = users()
        .router()
        .merge(count_route("movie", 10))
        .merge(count_route("review", 20))
        .merge(count_route("user", 30))
        .merge(count_route("actor", 40));
    let app = build_test_app(ServiceName::Admin, &spawn(stub).await);

    let token = token_for(1);
    let response = common::get(app, "/api/admin/app-info", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "appInfo": {
                "movieCount": 10,
                "reviewCount": 20,
                "userCount": 30,
                "actorCount": 40
            }
        })
    );
}

#[tokio::test]
async fn app_info_fails_whole_when_one_count_is_missing() {
    let stub = users()
        .router()
        .merge(count_route("movie", 10))
        .merge(count_route("user", 30))
        .merge(count_route("actor", 40));
    let app = build_test_app(ServiceName::Admin, &spawn(stub).await);

    let token = token_for(1);
    let response = common::get(app, "/api/admin/app-info", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "The review service is unavailable" })
    );
}

#[tokio::test]
async fn activity_feed_merges_sources_newest_first() {
    let stub = users()
        .router()
        .merge(log_route(
            ServiceName::User,
            vec![
                entry(ServiceName::User, 1, 2, ActivityAction::Login, 0),
                entry(ServiceName::User, 2, 1, ActivityAction::ChangeRole, 30),
            ],
        ))
        .merge(log_route(
            ServiceName::Movie,
            vec![entry(ServiceName::Movie, 1, 1, ActivityAction::CreateMovie, 20)],
        ))
        .merge(log_route(
            ServiceName::Actor,
            vec![entry(ServiceName::Actor, 1, 42, ActivityAction::CreateActor, 10)],
        ));
    // No review route: that source fails and contributes nothing.
    let app = build_test_app(ServiceName::Admin, &spawn(stub).await);

    let token = token_for(1);
    let response =
        common::get(app, "/api/admin/activity-logs?page=1&limit=3", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let logs = json["logs"].as_array().unwrap();

    let actions: Vec<&str> = logs.iter().map(|l| l["action"].as_str().unwrap()).collect();
    assert_eq!(actions, vec!["change_role", "create_movie", "create_actor"]);
    assert_eq!(logs[0]["user"]["email"], "u1@example.com");
    // User 42 no longer exists.
    assert!(logs[2]["user"].is_null());
    assert_eq!(json["totalPages"], 2);
    assert_eq!(json["currentPage"], 1);
}

#[tokio::test]
async fn activity_feed_filters_reach_every_source() {
    let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::<String>::new()));
    let recorder = seen.clone();
    let stub = users().router().route(
        "/api/movie/internal/activity-logs",
        get(move |uri: axum::http::Uri| {
            let recorder = recorder.clone();
            async move {
                recorder
                    .lock()
                    .unwrap()
                    .push(uri.query().unwrap_or_default().to_string());
                Json(Vec::<ActivityLogEntry>::new())
            }
        }),
    );
    let app = build_test_app(ServiceName::Admin, &spawn(stub).await);

    let token = token_for(1);
    let response = common::get(
        app,
        "/api/admin/activity-logs?userId=2&action=delete_movie&limit=10",
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let queries = seen.lock().unwrap().clone();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].contains("userId=2"));
    assert!(queries[0].contains("action=delete_movie"));
    assert!(queries[0].contains("limit=20"));
}

#[tokio::test]
async fn empty_feed_has_no_pages() {
    let app = build_test_app(ServiceName::Admin, &spawn(users().router()).await);

    let token = token_for(1);
    let json = body_json(common::get(app, "/api/admin/activity-logs", Some(&token)).await).await;

    assert_eq!(json["logs"], json!([]));
    assert_eq!(json["currentPage"], 1);
}
