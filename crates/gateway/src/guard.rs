//! Internal-path guard.

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Any path containing this marker is service-to-service only.
pub const INTERNAL_MARKER: &str = "internal";

/// Whether `path` names an internal endpoint.
///
/// Matches the marker anywhere in the path, case-insensitively, after
/// percent-decoding, so `/api/user/%69nternal/1` is caught as well.
pub fn is_internal_path(path: &str) -> bool {
    let decoded = urlencoding::decode(path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_string());
    decoded.to_ascii_lowercase().contains(INTERNAL_MARKER)
}

/// Middleware: refuse internal paths with 403, whatever the method or
/// target service.
pub async fn reject_internal(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if is_internal_path(path) {
        let original = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| path.to_string());
        tracing::warn!(method = %request.method(), path = %original, "Blocked internal path");
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "This endpoint is not accessible through API Gateway",
                "message": "Internal endpoints (/internal/*) are only available for service-to-service communication",
                "path": original,
            })),
        )
            .into_response();
    }
    next.run(request).await
}
