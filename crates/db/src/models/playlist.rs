//! Playlist entity model and DTOs.

use reelhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Playlist {
    pub id: DbId,
    pub owner: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub movies: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Playlist as listed on "my playlists".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistBrief {
    pub id: DbId,
    pub name: String,
    pub is_public: bool,
}

impl From<&Playlist> for PlaylistBrief {
    fn from(p: &Playlist) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            is_public: p.is_public,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePlaylist {
    pub owner: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
}
