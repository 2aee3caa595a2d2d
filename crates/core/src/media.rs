//! Contract with the third-party media host (images and videos).

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A stored remote asset. `public_id` is what the host needs to delete it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub url: String,
    pub public_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responsive: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// Upload options understood by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub kind: MediaKind,
    /// Resize the master to `(width, height)`.
    pub transform: Option<(u32, u32)>,
    /// Ask the host for up to this many responsive derivatives.
    pub responsive_breakpoints: Option<u32>,
}

impl UploadOptions {
    pub fn avatar() -> Self {
        Self {
            kind: MediaKind::Image,
            transform: Some((400, 400)),
            responsive_breakpoints: None,
        }
    }

    pub fn poster() -> Self {
        Self {
            kind: MediaKind::Image,
            transform: Some((1280, 720)),
            responsive_breakpoints: Some(3),
        }
    }

    pub fn trailer() -> Self {
        Self {
            kind: MediaKind::Video,
            transform: None,
            responsive_breakpoints: None,
        }
    }
}

/// Result reported by the host for a delete call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyOutcome {
    pub result: String,
}

impl DestroyOutcome {
    pub fn is_ok(&self) -> bool {
        self.result == "ok"
    }
}

#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(&self, path: &Path, options: &UploadOptions) -> Result<MediaAsset, CoreError>;

    async fn destroy(&self, public_id: &str, kind: MediaKind)
        -> Result<DestroyOutcome, CoreError>;
}

/// Delete a remote asset, failing unless the host explicitly reports `ok`.
///
/// Callers must not touch the owning record when this fails, otherwise the
/// remote asset would be orphaned.
pub async fn release(
    host: &dyn MediaHost,
    asset: &MediaAsset,
    kind: MediaKind,
    failure_message: &str,
) -> Result<(), CoreError> {
    let outcome = host.destroy(&asset.public_id, kind).await?;
    if outcome.is_ok() {
        Ok(())
    } else {
        tracing::warn!(
            public_id = %asset.public_id,
            result = %outcome.result,
            "Media host refused delete"
        );
        Err(CoreError::Validation(failure_message.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct ScriptedHost {
        result: &'static str,
        destroyed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MediaHost for ScriptedHost {
        async fn upload(
            &self,
            _path: &Path,
            _options: &UploadOptions,
        ) -> Result<MediaAsset, CoreError> {
            unreachable!("not used")
        }

        async fn destroy(
            &self,
            public_id: &str,
            _kind: MediaKind,
        ) -> Result<DestroyOutcome, CoreError> {
            self.destroyed.lock().unwrap().push(public_id.to_string());
            Ok(DestroyOutcome {
                result: self.result.to_string(),
            })
        }
    }

    fn asset() -> MediaAsset {
        MediaAsset {
            url: "https://cdn.example/a.png".into(),
            public_id: "a".into(),
            responsive: vec![],
        }
    }

    #[tokio::test]
    async fn release_succeeds_on_ok() {
        let host = ScriptedHost {
            result: "ok",
            destroyed: Mutex::new(vec![]),
        };
        release(&host, &asset(), MediaKind::Image, "nope").await.unwrap();
        assert_eq!(*host.destroyed.lock().unwrap(), vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn release_fails_on_anything_else() {
        let host = ScriptedHost {
            result: "not found",
            destroyed: Mutex::new(vec![]),
        };
        let err = release(&host, &asset(), MediaKind::Image, "Poster not found!")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(m) if m == "Poster not found!"));
    }
}
