//! Client metadata recorded alongside activity log entries.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use reelhub_events::RequestMeta;

/// Client ip (first `x-forwarded-for` hop) and user agent.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta(pub RequestMeta);

impl<S: Send + Sync> FromRequestParts<S> for ClientMeta {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientMeta(from_headers(&parts.headers)))
    }
}

fn from_headers(headers: &HeaderMap) -> RequestMeta {
    let header = |name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    RequestMeta {
        ip: header("x-forwarded-for")
            .and_then(|v| v.split(',').next().map(|hop| hop.trim().to_string()))
            .filter(|hop| !hop.is_empty()),
        user_agent: header(USER_AGENT.as_str()),
    }
}
