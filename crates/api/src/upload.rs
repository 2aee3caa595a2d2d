//! Multipart form handling for media uploads.
//!
//! Text fields are collected as-is; the single file field is written to a
//! temporary file under the staging directory and removed when the
//! [`StagedUpload`] is dropped, whether or not the media host accepted it.

use std::collections::HashMap;
use std::path::Path;

use axum::extract::Multipart;
use reelhub_core::media::MediaKind;
use tempfile::NamedTempFile;

use crate::error::{AppError, AppResult};

/// A file received in a multipart request, staged on local disk.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
    pub file_name: String,
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// A parsed multipart body.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<StagedUpload>,
}

impl UploadForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Fields as a JSON object. Names in `json_fields` hold JSON-encoded
    /// values (arrays, objects, numbers) and are decoded; everything else
    /// stays a string.
    pub fn to_json(&self, json_fields: &[&str]) -> AppResult<serde_json::Value> {
        let mut map = serde_json::Map::new();
        for (name, raw) in &self.fields {
            let value = if json_fields.contains(&name.as_str()) {
                serde_json::from_str(raw)
                    .map_err(|_| AppError::BadRequest(format!("Field '{name}' is not valid JSON")))?
            } else {
                serde_json::Value::String(raw.clone())
            };
            map.insert(name.clone(), value);
        }
        Ok(serde_json::Value::Object(map))
    }
}

fn accepts(kind: MediaKind, content_type: Option<&str>) -> bool {
    let prefix = match kind {
        MediaKind::Image => "image/",
        MediaKind::Video => "video/",
    };
    content_type.is_some_and(|ct| ct.starts_with(prefix))
}

/// Read every field of `multipart`. The field named `file_field` must carry
/// content of `kind` and is staged under `staging_dir`.
pub async fn read_form(
    mut multipart: Multipart,
    file_field: &str,
    kind: MediaKind,
    staging_dir: &Path,
) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == file_field {
            if !accepts(kind, field.content_type()) {
                return Err(AppError::validation(match kind {
                    MediaKind::Image => "Only image files are supported!",
                    MediaKind::Video => "Only video files are supported!",
                }));
            }
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            form.file = Some(stage(staging_dir, file_name, &data).await?);
        } else if !name.is_empty() {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}

async fn stage(staging_dir: &Path, file_name: String, data: &[u8]) -> AppResult<StagedUpload> {
    tokio::fs::create_dir_all(staging_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    let file = tempfile::Builder::new()
        .prefix("upload-")
        .tempfile_in(staging_dir)
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    tokio::fs::write(file.path(), data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    Ok(StagedUpload { file, file_name })
}
