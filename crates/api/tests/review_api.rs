//! Review service paths that run without a reachable database.

mod common;

use axum::http::{Method, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use common::{body_json, build_test_app, get, principal, send_json, spawn, token_for, UserStub};
use reelhub_core::service::ServiceName;
use serde_json::{json, Value};

fn movie_batch(movies: Value) -> Router {
    Router::new().route(
        "/api/movie/internal/batch",
        post(move || {
            let movies = movies.clone();
            async move { Json(movies) }
        }),
    )
}

fn movie(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "title": "Heat",
        "poster": null,
        "genres": ["crime"],
        "status": status,
        "reviewStats": { "ratingAvg": 0.0, "reviewCount": 0 }
    })
}

async fn review_app(movies: Option<Value>) -> Router {
    let mut stub = UserStub::new(vec![principal(5, "user")]).router();
    if let Some(movies) = movies {
        stub = stub.merge(movie_batch(movies));
    }
    build_test_app(ServiceName::Review, &spawn(stub).await)
}

#[tokio::test]
async fn rating_above_ten_is_rejected_before_any_lookup() {
    // No movie stub: reaching the movie service would answer 502.
    let app = review_app(None).await;
    let token = token_for(5);

    let response = send_json(
        app,
        Method::POST,
        "/api/review/add/7",
        Some(&token),
        json!({ "rating": 11, "content": "Too good" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        "Rating must be between 0 and 10!"
    );
}

#[tokio::test]
async fn private_movie_cannot_be_reviewed() {
    let app = review_app(Some(json!([movie(7, "private")]))).await;
    let token = token_for(5);

    let response = send_json(
        app,
        Method::POST,
        "/api/review/add/7",
        Some(&token),
        json!({ "rating": 8, "content": "Great" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Movie not found!");
}

#[tokio::test]
async fn deleted_movie_cannot_be_reviewed() {
    let app = review_app(Some(json!([]))).await;
    let token = token_for(5);

    let response = send_json(
        app,
        Method::POST,
        "/api/review/add/7",
        Some(&token),
        json!({ "rating": 8 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn movie_service_outage_is_a_bad_gateway() {
    let app = review_app(None).await;
    let token = token_for(5);

    let response = send_json(
        app,
        Method::POST,
        "/api/review/add/7",
        Some(&token),
        json!({ "rating": 8, "content": "Great" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        body_json(response).await["error"],
        "The movie service is unavailable"
    );
}

#[tokio::test]
async fn short_reply_is_rejected() {
    let app = review_app(None).await;
    let token = token_for(5);

    let response = send_json(
        app,
        Method::POST,
        "/api/review/add-reply/3",
        Some(&token),
        json!({ "content": "ok" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        "Content must be between 3 and 1000 characters"
    );
}

#[tokio::test]
async fn reviews_by_movie_with_storage_down_is_a_sanitised_500() {
    let app = review_app(Some(json!([movie(7, "public")]))).await;

    let response = get(app, "/api/review/get-reviews-by-movie/7", None).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "An internal error occurred");
}
