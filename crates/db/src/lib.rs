//! Postgres storage for the ReelHub services.
//!
//! Every service owns its own database. Schemas are split per service under
//! `migrations/<service>/` so a service only ever creates the tables it owns.

use reelhub_core::ServiceName;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

static USER_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/user");
static ACTOR_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/actor");
static MOVIE_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/movie");
static REVIEW_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/review");
static PLAYLIST_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/playlist");

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the pool can reach the server.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// The migration set owned by `service`, if it stores anything.
pub fn migrator(service: ServiceName) -> Option<&'static Migrator> {
    match service {
        ServiceName::User => Some(&USER_MIGRATIONS),
        ServiceName::Actor => Some(&ACTOR_MIGRATIONS),
        ServiceName::Movie => Some(&MOVIE_MIGRATIONS),
        ServiceName::Review => Some(&REVIEW_MIGRATIONS),
        ServiceName::Playlist => Some(&PLAYLIST_MIGRATIONS),
        ServiceName::Admin => None,
    }
}

/// Apply `service`'s pending migrations.
pub async fn run_migrations(pool: &DbPool, service: ServiceName) -> Result<(), MigrateError> {
    match migrator(service) {
        Some(migrator) => {
            tracing::debug!(%service, count = migrator.iter().count(), "Running migrations");
            migrator.run(pool).await
        }
        None => Ok(()),
    }
}

/// Whether `err` is a violation of the named unique constraint.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
