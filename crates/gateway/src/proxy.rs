//! Path-prefix reverse proxy.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::header::{self, HeaderMap, HeaderName};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reelhub_clients::ServiceUrls;
use reelhub_core::service::ServiceName;
use serde_json::json;

/// Headers that describe one hop and must not be forwarded.
const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Shared gateway state.
#[derive(Clone)]
pub struct GatewayState {
    pub client: reqwest::Client,
    pub urls: Arc<ServiceUrls>,
    pub max_body_bytes: usize,
}

/// The service owning `path`, if it has the form `/api/{service}[/...]`.
pub fn target_service(path: &str) -> Option<ServiceName> {
    let rest = path.strip_prefix("/api/")?;
    let segment = rest.split('/').next()?;
    segment.parse().ok()
}

fn strip_hop_headers(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
}

fn route_not_found(path: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found", "path": path })),
    )
        .into_response()
}

fn unavailable(service: ServiceName) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "error": "Service temporarily unavailable",
            "service": service.as_str(),
        })),
    )
        .into_response()
}

/// Fallback handler: forward the request to its owning service with the
/// same method, path, query, headers and body.
///
/// A transport failure answers 503. Upstream error statuses pass through
/// untouched.
pub async fn forward(State(state): State<GatewayState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());

    let Some(service) = target_service(parts.uri.path()) else {
        return route_not_found(&path_and_query);
    };

    let body = match to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, %service, "Rejected request body");
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({ "error": "Request body too large" })),
            )
                .into_response();
        }
    };

    let mut headers = parts.headers;
    strip_hop_headers(&mut headers);
    headers.remove(header::HOST);

    let url = format!("{}{}", state.urls.get(service), path_and_query);
    let upstream = state
        .client
        .request(parts.method.clone(), &url)
        .headers(headers)
        .body(body)
        .send()
        .await;

    let upstream = match upstream {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, %service, url = %url, "Proxy error");
            return unavailable(service);
        }
    };

    let status = upstream.status();
    if status.is_client_error() || status.is_server_error() {
        tracing::debug!(%status, method = %parts.method, path = %path_and_query, "Upstream error response");
    }

    let mut response_headers = upstream.headers().clone();
    strip_hop_headers(&mut response_headers);
    response_headers.remove(header::CONTENT_LENGTH);

    match upstream.bytes().await {
        Ok(bytes) => {
            let mut response = Response::new(Body::from(bytes));
            *response.status_mut() = status;
            *response.headers_mut() = response_headers;
            response
        }
        Err(e) => {
            tracing::error!(error = %e, %service, "Upstream body read failed");
            unavailable(service)
        }
    }
}
