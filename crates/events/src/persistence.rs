//! Durable activity log persistence.
//!
//! [`ActivityPersistence`] drains the recorder channel and writes every entry
//! through an [`ActivitySink`]. It runs as a long-lived background task and
//! stops when every recorder is dropped or the cancellation token fires.

use async_trait::async_trait;
use reelhub_core::types::DbId;
use reelhub_db::models::activity_log::NewActivityLog;
use reelhub_db::repositories::ActivityLogRepo;
use reelhub_db::DbPool;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Where persisted entries end up.
#[async_trait]
pub trait ActivitySink: Send + Sync {
    async fn append(&self, entry: &NewActivityLog) -> Result<DbId, sqlx::Error>;
}

/// Writes into the service's own `activity_logs` table.
#[derive(Debug, Clone)]
pub struct PgActivitySink {
    pool: DbPool,
}

impl PgActivitySink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivitySink for PgActivitySink {
    async fn append(&self, entry: &NewActivityLog) -> Result<DbId, sqlx::Error> {
        ActivityLogRepo::insert(&self.pool, entry).await
    }
}

/// Background service that persists activity entries.
pub struct ActivityPersistence;

impl ActivityPersistence {
    /// Run the persistence loop.
    ///
    /// Entries already queued when cancellation fires are still written.
    pub async fn run<S: ActivitySink>(
        sink: S,
        mut receiver: mpsc::Receiver<NewActivityLog>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                entry = receiver.recv() => match entry {
                    Some(entry) => Self::persist(&sink, &entry).await,
                    None => {
                        tracing::info!("Activity recorders dropped, persistence shutting down");
                        break;
                    }
                },
                _ = cancel.cancelled() => {
                    receiver.close();
                    while let Some(entry) = receiver.recv().await {
                        Self::persist(&sink, &entry).await;
                    }
                    tracing::info!("Activity persistence cancelled");
                    break;
                }
            }
        }
    }

    async fn persist<S: ActivitySink>(sink: &S, entry: &NewActivityLog) {
        if let Err(e) = sink.append(entry).await {
            tracing::error!(
                error = %e,
                action = %entry.action,
                user_id = ?entry.user_id,
                "Failed to persist activity log entry"
            );
        }
    }
}
