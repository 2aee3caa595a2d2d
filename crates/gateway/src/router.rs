//! Gateway router and middleware stack.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::routing::get;
use axum::{middleware, Json, Router};
use reelhub_core::service::ServiceName;
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::GatewayConfig;
use crate::guard::reject_internal;
use crate::proxy::{forward, GatewayState};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    /// Upstream base URL per service.
    pub services: BTreeMap<&'static str, String>,
}

/// GET /health
async fn health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "API Gateway is running",
        services: ServiceName::ALL
            .into_iter()
            .map(|s| (s.as_str(), state.urls.get(s).to_string()))
            .collect(),
    })
}

/// Build the gateway state from configuration.
///
/// The upstream client carries no timeout of its own; the request-level
/// `TimeoutLayer` bounds the whole exchange.
pub fn build_state(config: &GatewayConfig) -> Result<GatewayState, reqwest::Error> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    Ok(GatewayState {
        client,
        urls: Arc::new(config.service_urls.clone()),
        max_body_bytes: config.max_body_bytes,
    })
}

/// Build the full gateway [`Router`].
///
/// The internal-path guard wraps both `/health` and the proxy fallback, so
/// it runs before any routing decision.
pub fn build_gateway_router(state: GatewayState, config: &GatewayConfig) -> Router {
    let cors = build_cors_layer(config);
    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .route("/health", get(health))
        .fallback(forward)
        .layer(middleware::from_fn(reject_internal))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Build the CORS layer. Panics at startup on an invalid origin.
pub fn build_cors_layer(config: &GatewayConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
