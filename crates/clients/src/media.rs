//! Client for the third-party media host.
//!
//! Speaks the Cloudinary-style upload API: signed multipart uploads per
//! resource type and signed destroy calls that report `{ "result": "ok" }`.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reelhub_core::error::CoreError;
use reelhub_core::media::{DestroyOutcome, MediaAsset, MediaHost, MediaKind, UploadOptions};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::ClientError;

/// Credentials and endpoint of the media host.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub base_url: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl MediaConfig {
    /// Load from environment variables.
    ///
    /// | Env Var            | Default                            |
    /// |--------------------|------------------------------------|
    /// | `MEDIA_BASE_URL`   | `https://api.cloudinary.com/v1_1`  |
    /// | `MEDIA_CLOUD_NAME` | empty                              |
    /// | `MEDIA_API_KEY`    | empty                              |
    /// | `MEDIA_API_SECRET` | empty                              |
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("MEDIA_BASE_URL")
                .unwrap_or_else(|_| "https://api.cloudinary.com/v1_1".into()),
            cloud_name: std::env::var("MEDIA_CLOUD_NAME").unwrap_or_default(),
            api_key: std::env::var("MEDIA_API_KEY").unwrap_or_default(),
            api_secret: std::env::var("MEDIA_API_SECRET").unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    #[serde(default)]
    responsive_breakpoints: Vec<BreakpointSet>,
}

#[derive(Debug, Deserialize)]
struct BreakpointSet {
    #[serde(default)]
    breakpoints: Vec<Breakpoint>,
}

#[derive(Debug, Deserialize)]
struct Breakpoint {
    secure_url: String,
}

impl From<UploadResponse> for MediaAsset {
    fn from(r: UploadResponse) -> Self {
        let responsive = r
            .responsive_breakpoints
            .into_iter()
            .next()
            .map(|set| set.breakpoints.into_iter().map(|b| b.secure_url).collect())
            .unwrap_or_default();
        MediaAsset {
            url: r.secure_url,
            public_id: r.public_id,
            responsive,
        }
    }
}

/// Signature over the sorted request parameters: hex SHA-256 of
/// `k1=v1&k2=v2...` followed by the API secret.
pub fn sign(params: &BTreeMap<&str, String>, secret: &str) -> String {
    let joined = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let digest = Sha256::digest(format!("{joined}{secret}").as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// [`MediaHost`] backed by the remote HTTP API.
#[derive(Debug, Clone)]
pub struct HttpMediaHost {
    client: reqwest::Client,
    config: MediaConfig,
}

impl HttpMediaHost {
    pub fn new(config: MediaConfig, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, kind: MediaKind, action: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.cloud_name,
            kind.as_str(),
            action
        )
    }

    /// Parameters that take part in the signature, for an upload.
    fn upload_params(options: &UploadOptions, timestamp: i64) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        params.insert("timestamp", timestamp.to_string());
        params.insert("signature_algorithm", "sha256".to_string());
        if let Some((w, h)) = options.transform {
            params.insert("transformation", format!("w_{w},h_{h}"));
        }
        if let Some(max_images) = options.responsive_breakpoints {
            params.insert(
                "responsive_breakpoints",
                serde_json::json!([{
                    "create_derived": true,
                    "max_width": 640,
                    "max_images": max_images,
                }])
                .to_string(),
            );
        }
        params
    }

    async fn try_upload(
        &self,
        path: &Path,
        options: &UploadOptions,
    ) -> Result<MediaAsset, ClientError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let mut params = Self::upload_params(options, chrono::Utc::now().timestamp());
        let signature = sign(&params, &self.config.api_secret);
        params.insert("signature", signature);
        params.insert("api_key", self.config.api_key.clone());

        let mut form = reqwest::multipart::Form::new()
            .part("file", reqwest::multipart::Part::bytes(bytes).file_name(file_name));
        for (key, value) in params {
            form = form.text(key, value);
        }

        let response = self
            .client
            .post(self.endpoint(options.kind, "upload"))
            .multipart(form)
            .send()
            .await?;
        let body: UploadResponse = Self::parse_response(response).await?;
        Ok(body.into())
    }

    async fn try_destroy(
        &self,
        public_id: &str,
        kind: MediaKind,
    ) -> Result<DestroyOutcome, ClientError> {
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        params.insert("signature_algorithm", "sha256".to_string());
        let signature = sign(&params, &self.config.api_secret);
        params.insert("signature", signature);
        params.insert("api_key", self.config.api_key.clone());

        let response = self
            .client
            .post(self.endpoint(kind, "destroy"))
            .form(&params)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
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
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl MediaHost for HttpMediaHost {
    async fn upload(&self, path: &Path, options: &UploadOptions) -> Result<MediaAsset, CoreError> {
        self.try_upload(path, options).await.map_err(|e| {
            tracing::error!(error = %e, kind = options.kind.as_str(), "Media upload failed");
            CoreError::Internal(format!("Media upload failed: {e}"))
        })
    }

    async fn destroy(&self, public_id: &str, kind: MediaKind) -> Result<DestroyOutcome, CoreError> {
        self.try_destroy(public_id, kind).await.map_err(|e| {
            tracing::error!(error = %e, public_id, "Media delete failed");
            CoreError::Internal(format!("Media delete failed: {e}"))
        })
    }
}
