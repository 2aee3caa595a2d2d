//! Sibling clients against stub services bound to ephemeral ports.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use reelhub_clients::{
    ActorClient, ClientError, HttpMediaHost, InternalClient, MediaConfig, MovieClient, UserClient,
};
use reelhub_core::activity::{ActivityAction, ActivityLogEntry, ActivityLogQuery};
use reelhub_core::aggregation::{ActivityLogSource, BatchLookup, CountSource};
use reelhub_core::contracts::{ActorSummary, BatchRequest, UserSummary};
use reelhub_core::error::CoreError;
use reelhub_core::media::{MediaHost, MediaKind, UploadOptions};
use reelhub_core::review_stats::{ReviewStats, ReviewStatsPatch};
use reelhub_core::service::ServiceName;
use serde_json::{json, Value};

/// Serve `app` on 127.0.0.1 and return its base URL.
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(service: ServiceName, base: &str) -> InternalClient {
    InternalClient::new(service, base, Duration::from_secs(2)).unwrap()
}

// ---------------------------------------------------------------------------
// Batch lookups
// ---------------------------------------------------------------------------

#[tokio::test]
async fn user_batch_posts_the_requested_ids() {
    let seen: Arc<Mutex<Vec<BatchRequest>>> = Arc::default();
    let app = Router::new()
        .route(
            "/api/user/internal/batch",
            post(
                |State(seen): State<Arc<Mutex<Vec<BatchRequest>>>>,
                 Json(body): Json<BatchRequest>| async move {
                    let users: Vec<UserSummary> = body
                        .ids
                        .iter()
                        .filter(|id| **id != 3)
                        .map(|id| UserSummary {
                            id: *id,
                            name: format!("user-{id}"),
                            email: format!("u{id}@example.com"),
                            avatar: None,
                        })
                        .collect();
                    seen.lock().unwrap().push(body);
                    Json(users)
                },
            ),
        )
        .with_state(seen.clone());
    let base = spawn(app).await;

    let users = UserClient::new(client(ServiceName::User, &base));
    let found = users.fetch_batch(&[1, 3]).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "user-1");
    assert_eq!(seen.lock().unwrap()[0].ids, vec![1, 3]);
}

#[tokio::test]
async fn actor_batch_non_2xx_is_attributed_to_the_actor_service() {
    let app = Router::new().route(
        "/api/actor/internal/batch",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = spawn(app).await;

    let actors = ActorClient::new(client(ServiceName::Actor, &base));
    let err = actors.fetch_batch(&[1]).await.unwrap_err();

    assert_matches!(err, CoreError::Upstream { service: "actor", message } if message.contains("500"));
}

#[tokio::test]
async fn unreachable_service_is_an_upstream_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let movies = MovieClient::new(client(ServiceName::Movie, &base));
    let err = movies.fetch_batch(&[1]).await.unwrap_err();
    assert_matches!(err, CoreError::Upstream { service: "movie", .. });
}

#[tokio::test]
async fn slow_service_times_out() {
    let app = Router::new().route(
        "/api/user/internal/batch",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(Vec::<UserSummary>::new())
        }),
    );
    let base = spawn(app).await;

    let inner = InternalClient::new(ServiceName::User, &base, Duration::from_millis(100)).unwrap();
    let err = inner
        .post::<Vec<UserSummary>, _>(inner.internal_url("/batch"), &BatchRequest { ids: vec![1] })
        .await
        .unwrap_err();
    assert!(err.is_timeout());
}

// ---------------------------------------------------------------------------
// User principal
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_principal_is_none() {
    let app = Router::new().route(
        "/api/user/internal/{id}",
        get(|Path(id): Path<i64>| async move {
            if id == 1 {
                Ok(Json(json!({
                    "id": 1,
                    "name": "Ada",
                    "email": "ada@example.com",
                    "role": "admin",
                    "isVerified": true,
                    "avatar": null,
                    "favorites": [4],
                    "isBlocked": false,
                    "blockedUntil": null
                })))
            } else {
                Err((StatusCode::NOT_FOUND, Json(json!({ "error": "User not found" }))))
            }
        }),
    );
    let base = spawn(app).await;
    let users = UserClient::new(client(ServiceName::User, &base));

    let ada = users.principal(1).await.unwrap().unwrap();
    assert_eq!(ada.name, "Ada");
    assert!(ada.has_favorite(4));
    assert!(users.principal(2).await.unwrap().is_none());
}

#[tokio::test]
async fn principal_server_error_is_not_swallowed() {
    let app = Router::new().route(
        "/api/user/internal/{id}",
        get(|| async { StatusCode::BAD_GATEWAY }),
    );
    let base = spawn(app).await;
    let users = UserClient::new(client(ServiceName::User, &base));

    assert_matches!(
        users.principal(1).await,
        Err(ClientError::Api { status: 502, .. })
    );
}

// ---------------------------------------------------------------------------
// Movie review stats
// ---------------------------------------------------------------------------

#[tokio::test]
async fn review_stats_patch_reaches_the_movie() {
    let seen: Arc<Mutex<Vec<(i64, Value)>>> = Arc::default();
    let app = Router::new()
        .route(
            "/api/movie/internal/{id}/review-stats",
            patch(
                |State(seen): State<Arc<Mutex<Vec<(i64, Value)>>>>,
                 Path(id): Path<i64>,
                 Json(body): Json<Value>| async move {
                    seen.lock().unwrap().push((id, body));
                    Json(json!({ "success": true }))
                },
            ),
        )
        .with_state(seen.clone());
    let base = spawn(app).await;

    let movies = MovieClient::new(client(ServiceName::Movie, &base));
    movies
        .patch_review_stats(7, &ReviewStatsPatch::added(ReviewStats::compute(&[8.0, 6.0]), 9))
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].0, 7);
    assert_eq!(seen[0].1["addReviewId"], 9);
    assert_eq!(seen[0].1["ratingAvg"], 7.0);
    assert_eq!(seen[0].1["reviewCount"], 2);
}

// ---------------------------------------------------------------------------
// Counts and activity logs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn count_reads_the_internal_counter() {
    let app = Router::new().route(
        "/api/review/internal/count",
        get(|| async { Json(json!({ "count": 42 })) }),
    );
    let base = spawn(app).await;

    let reviews = client(ServiceName::Review, &base);
    assert_eq!(CountSource::service(&reviews), ServiceName::Review);
    assert_eq!(reviews.count().await.unwrap(), 42);
}

#[tokio::test]
async fn activity_log_filters_travel_as_query_params() {
    let app = Router::new().route(
        "/api/user/internal/activity-logs",
        get(|Query(query): Query<ActivityLogQuery>| async move {
            let entry = ActivityLogEntry {
                id: 1,
                service: ServiceName::User,
                user: query.user_id,
                action: query.action.unwrap_or(ActivityAction::Login),
                details: Some(format!("limit={}", query.effective_limit())),
                ip: None,
                user_agent: None,
                created_at: chrono::Utc::now(),
            };
            Json(vec![entry])
        }),
    );
    let base = spawn(app).await;

    let users = client(ServiceName::User, &base);
    let logs = users
        .activity_logs(&ActivityLogQuery {
            user_id: Some(5),
            action: Some(ActivityAction::ChangeRole),
            limit: Some(20),
        })
        .await
        .unwrap();

    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].user, Some(5));
    assert_eq!(logs[0].action, ActivityAction::ChangeRole);
    assert_eq!(logs[0].details.as_deref(), Some("limit=20"));
}

#[tokio::test]
async fn actor_profile_search_unwraps_the_profiles() {
    let app = Router::new().route(
        "/api/actor/internal/get-all",
        get(|| async {
            Json(json!({
                "profiles": [ActorSummary {
                    id: 3,
                    name: "Keanu".into(),
                    about: String::new(),
                    gender: "male".into(),
                    avatar: None,
                    birthday: None,
                }]
            }))
        }),
    );
    let base = spawn(app).await;

    let actors = ActorClient::new(client(ServiceName::Actor, &base));
    let found = actors.search_profiles("kea", 20).await.unwrap();
    assert_eq!(found[0].id, 3);
}

// ---------------------------------------------------------------------------
// Media host
// ---------------------------------------------------------------------------

fn media_host(base: &str) -> HttpMediaHost {
    HttpMediaHost::new(
        MediaConfig {
            base_url: base.to_string(),
            cloud_name: "demo".into(),
            api_key: "key".into(),
            api_secret: "secret".into(),
        },
        Duration::from_secs(2),
    )
    .unwrap()
}

#[tokio::test]
async fn media_upload_maps_the_host_response() {
    let app = Router::new().route(
        "/demo/image/upload",
        post(|| async {
            Json(json!({
                "secure_url": "https://media.test/poster.jpg",
                "public_id": "poster",
                "responsive_breakpoints": [{
                    "breakpoints": [{ "secure_url": "https://media.test/poster-640.jpg" }]
                }]
            }))
        }),
    );
    let base = spawn(app).await;

    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), b"not really a jpeg").unwrap();

    let asset = media_host(&base)
        .upload(file.path(), &UploadOptions::poster())
        .await
        .unwrap();
    assert_eq!(asset.public_id, "poster");
    assert_eq!(asset.responsive, vec!["https://media.test/poster-640.jpg"]);
}

#[tokio::test]
async fn media_destroy_reports_the_host_result() {
    let app = Router::new().route(
        "/demo/video/destroy",
        post(|| async { Json(json!({ "result": "not found" })) }),
    );
    let base = spawn(app).await;

    let outcome = media_host(&base)
        .destroy("trailer", MediaKind::Video)
        .await
        .unwrap();
    assert!(!outcome.is_ok());
}

#[tokio::test]
async fn media_upload_of_missing_file_fails() {
    let host = media_host("http://127.0.0.1:9");
    let err = host
        .upload(std::path::Path::new("/nonexistent/upload.bin"), &UploadOptions::avatar())
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Internal(_));
}
