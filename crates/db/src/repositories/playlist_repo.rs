//! Repository for the `playlists` table.
//!
//! Every lookup and mutation is scoped to the owning user.

use reelhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::playlist::{CreatePlaylist, Playlist};

const COLUMNS: &str = "id, owner, name, description, is_public, movies, created_at, updated_at";

pub struct PlaylistRepo;

impl PlaylistRepo {
    pub async fn create(pool: &PgPool, input: &CreatePlaylist) -> Result<Playlist, sqlx::Error> {
        let query = format!(
            "INSERT INTO playlists (owner, name, description, is_public)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Playlist>(&query)
            .bind(input.owner)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.is_public)
            .fetch_one(pool)
            .await
    }

    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        owner: DbId,
    ) -> Result<Option<Playlist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM playlists WHERE id = $1 AND owner = $2");
        sqlx::query_as::<_, Playlist>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_owner(pool: &PgPool, owner: DbId) -> Result<Vec<Playlist>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM playlists WHERE owner = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Playlist>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// Append `movie_id` unless it is already present. Returns `true` if
    /// the playlist changed.
    pub async fn add_movie(
        pool: &PgPool,
        id: DbId,
        owner: DbId,
        movie_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE playlists SET movies = array_append(movies, $3), updated_at = NOW()
             WHERE id = $1 AND owner = $2 AND NOT ($3 = ANY(movies))",
        )
        .bind(id)
        .bind(owner)
        .bind(movie_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns `true` if the playlist exists for `owner`.
    pub async fn remove_movie(
        pool: &PgPool,
        id: DbId,
        owner: DbId,
        movie_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE playlists SET movies = array_remove(movies, $3), updated_at = NOW()
             WHERE id = $1 AND owner = $2",
        )
        .bind(id)
        .bind(owner)
        .bind(movie_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_owned(pool: &PgPool, id: DbId, owner: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM playlists")
            .fetch_one(pool)
            .await
    }
}
