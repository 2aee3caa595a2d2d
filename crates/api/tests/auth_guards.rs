//! Principal resolution and role guards, against a stub user service.

mod common;

use axum::http::{Method, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration, Utc};
use common::{body_json, build_test_app, principal, send_json, spawn, token_for, UserStub};
use reelhub_core::service::ServiceName;
use serde_json::json;

fn top_rated_stub() -> Router {
    Router::new().route(
        "/api/movie/top-rated",
        get(|| async {
            Json(json!({
                "movies": [{
                    "id": 7,
                    "title": "Heat",
                    "poster": null,
                    "responsivePosters": [],
                    "reviews": { "ratingAvg": 9.1, "reviewCount": 12 }
                }]
            }))
        }),
    )
}

async fn admin_app(users: &UserStub) -> Router {
    let base = spawn(users.router().merge(top_rated_stub())).await;
    build_test_app(ServiceName::Admin, &base)
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let app = admin_app(&UserStub::default()).await;
    let response = common::get(app, "/api/admin/most-rated", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Unauthorized access!");
}

#[tokio::test]
async fn token_for_a_deleted_user_is_rejected() {
    let app = admin_app(&UserStub::default()).await;
    let token = token_for(99);
    let response = common::get(app, "/api/admin/most-rated", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forged_token_is_rejected() {
    let app = admin_app(&UserStub::new(vec![principal(1, "admin")])).await;
    let response = common::get(app, "/api/admin/most-rated", Some("not.a.jwt")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid or expired token");
}

#[tokio::test]
async fn non_admin_is_forbidden() {
    let app = admin_app(&UserStub::new(vec![principal(2, "moderator")])).await;
    let token = token_for(2);
    let response = common::get(app, "/api/admin/most-rated", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Admin role required");
}

#[tokio::test]
async fn permanently_blocked_admin_is_rejected_with_the_block_message() {
    let mut blocked = principal(1, "admin");
    blocked["isBlocked"] = json!(true);
    let users = UserStub::new(vec![blocked]);
    let app = admin_app(&users).await;

    let token = token_for(1);
    let response = common::get(app, "/api/admin/most-rated", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        "Your account has been blocked permanently"
    );
    assert!(users.unblocked().is_empty());
}

#[tokio::test]
async fn temporary_block_reports_its_end_date() {
    let until = Utc::now() + Duration::days(3);
    let mut blocked = principal(1, "admin");
    blocked["isBlocked"] = json!(true);
    blocked["blockedUntil"] = json!(until);
    let app = admin_app(&UserStub::new(vec![blocked])).await;

    let token = token_for(1);
    let response = common::get(app, "/api/admin/most-rated", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        format!("Account blocked until {}", until.format("%Y-%m-%d"))
    );
}

#[tokio::test]
async fn expired_block_is_lifted_and_the_request_proceeds() {
    let mut lapsed = principal(1, "admin");
    lapsed["isBlocked"] = json!(true);
    lapsed["blockedUntil"] = json!(Utc::now() - Duration::hours(1));
    let users = UserStub::new(vec![lapsed]);
    let app = admin_app(&users).await;

    let token = token_for(1);
    let response = common::get(app, "/api/admin/most-rated", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["movies"][0]["title"], "Heat");
    assert_eq!(users.unblocked(), vec![1]);
}

#[tokio::test]
async fn unverified_user_cannot_review() {
    let mut unverified = principal(5, "user");
    unverified["isVerified"] = json!(false);
    let base = spawn(UserStub::new(vec![unverified]).router()).await;
    let app = build_test_app(ServiceName::Review, &base);

    let token = token_for(5);
    let response = send_json(
        app,
        Method::POST,
        "/api/review/add/7",
        Some(&token),
        json!({ "rating": 8, "content": "Great" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["error"],
        "Please verify your account first!"
    );
}
