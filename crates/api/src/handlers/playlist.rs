//! Handlers for the playlist service (`/api/playlist`).
//!
//! Playlists are private to their owner: every lookup is scoped by owner,
//! so another user's playlist reads as not found.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use reelhub_core::aggregation::catalog::{compose_movie_cards, MovieCard};
use reelhub_core::aggregation::BatchLookup;
use reelhub_core::types::DbId;
use reelhub_db::models::playlist::{CreatePlaylist, PlaylistBrief};
use reelhub_db::repositories::PlaylistRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    #[validate(length(min = 1, max = 100, message = "Playlist name is missing!"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

/// Body of `add-movie` and `remove-movie`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistMovieRequest {
    pub playlist_id: DbId,
    pub movie_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct PlaylistCreated {
    pub playlist: PlaylistBrief,
}

#[derive(Debug, Serialize)]
pub struct MyPlaylists {
    pub playlists: Vec<PlaylistBrief>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDetail {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub movies: Vec<MovieCard>,
}

#[derive(Debug, Serialize)]
pub struct PlaylistEnvelope {
    pub playlist: PlaylistDetail,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/playlist/create
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<CreatePlaylistRequest>,
) -> AppResult<(StatusCode, Json<PlaylistCreated>)> {
    input.validate()?;

    let description = input
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    let playlist = PlaylistRepo::create(
        state.db()?,
        &CreatePlaylist {
            owner: user.id,
            name: input.name.trim().to_string(),
            description,
            is_public: input.is_public,
        },
    )
    .await?;

    tracing::info!(playlist_id = playlist.id, user_id = user.id, "Playlist created");

    Ok((
        StatusCode::CREATED,
        Json(PlaylistCreated {
            playlist: PlaylistBrief::from(&playlist),
        }),
    ))
}

/// POST /api/playlist/add-movie
pub async fn add_movie(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<PlaylistMovieRequest>,
) -> AppResult<Json<MessageResponse>> {
    let pool = state.db()?;
    let playlist = PlaylistRepo::find_owned(pool, input.playlist_id, user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Playlist", input.playlist_id))?;

    if playlist.movies.contains(&input.movie_id) {
        return Err(AppError::validation("Movie already in playlist!"));
    }

    let found = state.siblings.movie.fetch_batch(&[input.movie_id]).await?;
    if found.is_empty() {
        return Err(AppError::not_found("Movie", input.movie_id));
    }

    // A concurrent add of the same movie leaves the array untouched.
    if !PlaylistRepo::add_movie(pool, playlist.id, user.id, input.movie_id).await? {
        return Err(AppError::validation("Movie already in playlist!"));
    }

    Ok(Json(MessageResponse::new("Movie added to playlist!")))
}

/// POST /api/playlist/remove-movie
pub async fn remove_movie(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<PlaylistMovieRequest>,
) -> AppResult<Json<MessageResponse>> {
    let pool = state.db()?;
    let playlist = PlaylistRepo::find_owned(pool, input.playlist_id, user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Playlist", input.playlist_id))?;

    if !playlist.movies.contains(&input.movie_id) {
        return Err(AppError::validation("Movie not in playlist!"));
    }

    PlaylistRepo::remove_movie(pool, playlist.id, user.id, input.movie_id).await?;
    Ok(Json(MessageResponse::new("Movie removed from playlist!")))
}

/// GET /api/playlist/my-playlists
pub async fn my_playlists(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<MyPlaylists>> {
    let playlists = PlaylistRepo::list_by_owner(state.db()?, user.id).await?;
    Ok(Json(MyPlaylists {
        playlists: playlists.iter().map(PlaylistBrief::from).collect(),
    }))
}

/// DELETE /api/playlist/{id}
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !PlaylistRepo::delete_owned(state.db()?, id, user.id).await? {
        return Err(AppError::not_found("Playlist", id));
    }
    tracing::info!(playlist_id = id, user_id = user.id, "Playlist deleted");
    Ok(Json(MessageResponse::new("Playlist deleted!")))
}

/// GET /api/playlist/{id}
///
/// Movies keep the playlist's order; deleted movies drop out. An empty
/// playlist never calls the movie service.
pub async fn single(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<PlaylistEnvelope>> {
    let playlist = PlaylistRepo::find_owned(state.db()?, id, user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Playlist", id))?;

    let movies = compose_movie_cards(&playlist.movies, &state.siblings.movie).await?;

    Ok(Json(PlaylistEnvelope {
        playlist: PlaylistDetail {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            is_public: playlist.is_public,
            movies,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_name_is_required() {
        let request: CreatePlaylistRequest =
            serde_json::from_value(serde_json::json!({ "name": "" })).unwrap();
        let err = AppError::from(request.validate().unwrap_err());
        assert!(err.to_string().contains("Playlist name is missing!"));
    }

    #[test]
    fn visibility_defaults_to_private() {
        let request: CreatePlaylistRequest =
            serde_json::from_value(serde_json::json!({ "name": "Sunday" })).unwrap();
        assert!(!request.is_public);
        assert!(request.description.is_none());
    }
}
