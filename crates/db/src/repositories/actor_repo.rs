//! Repository for the `actors` table.

use reelhub_core::media::MediaAsset;
use reelhub_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::actor::{Actor, ActorInput};

const COLUMNS: &str = "id, name, about, gender, birthday, avatar, created_at, updated_at";

pub struct ActorRepo;

impl ActorRepo {
    pub async fn create(
        pool: &PgPool,
        input: &ActorInput,
        avatar: Option<&MediaAsset>,
    ) -> Result<Actor, sqlx::Error> {
        let query = format!(
            "INSERT INTO actors (name, about, gender, birthday, avatar)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(&input.name)
            .bind(&input.about)
            .bind(&input.gender)
            .bind(input.birthday)
            .bind(avatar.map(Json))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Actor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM actors WHERE id = $1");
        sqlx::query_as::<_, Actor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Actor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM actors WHERE id = ANY($1)");
        sqlx::query_as::<_, Actor>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Replace the profile fields. The avatar is only touched when `avatar`
    /// is `Some`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ActorInput,
        avatar: Option<&MediaAsset>,
    ) -> Result<Option<Actor>, sqlx::Error> {
        let query = format!(
            "UPDATE actors SET
                name = $2,
                about = $3,
                gender = $4,
                birthday = $5,
                avatar = COALESCE($6, avatar),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.about)
            .bind(&input.gender)
            .bind(input.birthday)
            .bind(avatar.map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM actors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Case-insensitive substring match on name.
    pub async fn search_by_name(
        pool: &PgPool,
        name: &str,
        limit: i64,
    ) -> Result<Vec<Actor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM actors
             WHERE name ILIKE '%' || $1 || '%'
             ORDER BY name
             LIMIT $2"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(name)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn latest(pool: &PgPool, limit: i64) -> Result<Vec<Actor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM actors ORDER BY created_at DESC LIMIT $1");
        sqlx::query_as::<_, Actor>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        name: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Actor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM actors
             WHERE ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%')
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(name)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_filtered(pool: &PgPool, name: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM actors WHERE ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%')",
        )
        .bind(name)
        .fetch_one(pool)
        .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM actors")
            .fetch_one(pool)
            .await
    }
}
