use reelhub_core::error::CoreError;
use reelhub_core::service::ServiceName;

/// Errors from calls to sibling services and the media host.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (connect, DNS, TLS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A local file could not be read for upload.
    #[error("Failed to read upload: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Request(e) if e.is_timeout())
    }

    /// Attribute this failure to `service` for the caller's error taxonomy.
    pub fn upstream(self, service: ServiceName) -> CoreError {
        CoreError::Upstream {
            service: service.as_str(),
            message: self.to_string(),
        }
    }
}
