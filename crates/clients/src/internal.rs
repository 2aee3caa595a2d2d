//! Shared transport for `.../internal/...` endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reelhub_core::activity::{ActivityLogEntry, ActivityLogQuery};
use reelhub_core::aggregation::{ActivityLogSource, CountSource};
use reelhub_core::contracts::CountResponse;
use reelhub_core::error::CoreError;
use reelhub_core::service::ServiceName;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ClientError;

/// Default bound on every sibling call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client bound to one sibling service.
///
/// Calls go straight to the sibling's own address, never through the
/// gateway, which refuses internal paths.
#[derive(Debug, Clone)]
pub struct InternalClient {
    client: reqwest::Client,
    base_url: String,
    service: ServiceName,
}

impl InternalClient {
    /// Create a client for `service` at `base_url` with a per-call timeout.
    pub fn new(
        service: ServiceName,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(service, client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`] (shares its
    /// connection pool and timeout).
    pub fn with_client(
        service: ServiceName,
        client: reqwest::Client,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            service,
        }
    }

    pub fn service(&self) -> ServiceName {
        self.service
    }

    /// `{base}/api/{service}/internal{path}`
    pub fn internal_url(&self, path: &str) -> String {
        format!("{}/api/{}/internal{}", self.base_url, self.service, path)
    }

    /// `{base}/api/{service}{path}`
    pub fn public_url(&self, path: &str) -> String {
        format!("{}/api/{}{}", self.base_url, self.service, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, url: String) -> Result<T, ClientError> {
        let response = self.client.get(url).send().await?;
        Self::parse_response(response).await
    }

    pub async fn get_with_query<T, Q>(&self, url: String, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.client.get(url).query(query).send().await?;
        Self::parse_response(response).await
    }

    pub async fn post<T, B>(&self, url: String, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.client.post(url).json(body).send().await?;
        Self::parse_response(response).await
    }

    /// Send a `PATCH`, discarding the response body.
    pub async fn patch<B>(&self, url: String, body: &B) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        let response = self.client.patch(url).json(body).send().await?;
        Self::check_status(response).await
    }

    /// Convert a transport failure into the caller-facing error.
    pub fn upstream(&self, err: ClientError) -> CoreError {
        err.upstream(self.service)
    }

    // ---- private helpers ----

    /// Returns the response unchanged on success, or a
    /// [`ClientError::Api`] carrying the status and body on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), ClientError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl CountSource for InternalClient {
    fn service(&self) -> ServiceName {
        self.service
    }

    async fn count(&self) -> Result<i64, CoreError> {
        let body: CountResponse = self
            .get(self.internal_url("/count"))
            .await
            .map_err(|e| self.upstream(e))?;
        Ok(body.count)
    }
}

#[async_trait]
impl ActivityLogSource for InternalClient {
    fn service(&self) -> ServiceName {
        self.service
    }

    async fn activity_logs(
        &self,
        query: &ActivityLogQuery,
    ) -> Result<Vec<ActivityLogEntry>, CoreError> {
        self.get_with_query(self.internal_url("/activity-logs"), query)
            .await
            .map_err(|e| self.upstream(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_under_the_service_prefix() {
        let client = InternalClient::with_client(
            ServiceName::Movie,
            reqwest::Client::new(),
            "http://movie-service:8002/",
        );
        assert_eq!(
            client.internal_url("/batch"),
            "http://movie-service:8002/api/movie/internal/batch"
        );
        assert_eq!(
            client.public_url("/top-rated"),
            "http://movie-service:8002/api/movie/top-rated"
        );
    }
}
