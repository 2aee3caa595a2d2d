//! Best-effort review statistic pushes to the movie service.
//!
//! Review handlers compute the new statistics themselves and hand the patch
//! to [`ReviewStatsPublisher::submit`]. A single worker sends patches in
//! submission order. Once submitted, a patch is sent even if the request
//! that produced it is aborted; failures are logged and never retried, since
//! the next mutation recomputes from the full review set. For the same
//! reason a patch is dropped, not queued, when the buffer is full.

use reelhub_clients::MovieClient;
use reelhub_core::review_stats::ReviewStatsPatch;
use reelhub_core::types::DbId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

type Job = (DbId, ReviewStatsPatch);

/// Default buffer capacity for queued patches.
pub const DEFAULT_CAPACITY: usize = 256;

/// Handle for queueing review statistic patches.
#[derive(Debug, Clone)]
pub struct ReviewStatsPublisher {
    sender: mpsc::Sender<Job>,
}

impl ReviewStatsPublisher {
    /// Start the worker. It runs until `cancel` fires (after draining) or
    /// every publisher handle is dropped.
    pub fn spawn(movies: MovieClient, cancel: CancellationToken) -> (Self, JoinHandle<()>) {
        Self::spawn_with_capacity(movies, DEFAULT_CAPACITY, cancel)
    }

    pub fn spawn_with_capacity(
        movies: MovieClient,
        capacity: usize,
        cancel: CancellationToken,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity);
        let handle = tokio::spawn(run(movies, receiver, cancel));
        (Self { sender }, handle)
    }

    /// Queue a patch for `movie_id`. Never waits on the network.
    ///
    /// Returns `false` when the patch was dropped.
    pub fn submit(&self, movie_id: DbId, patch: ReviewStatsPatch) -> bool {
        match self.sender.try_send((movie_id, patch)) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(movie_id, "Review stats buffer is full, patch dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::error!(movie_id, "Review stats worker is gone, patch dropped");
                false
            }
        }
    }
}

async fn run(
    movies: MovieClient,
    mut receiver: mpsc::Receiver<Job>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            job = receiver.recv() => match job {
                Some((movie_id, patch)) => push(&movies, movie_id, &patch).await,
                None => break,
            },
            _ = cancel.cancelled() => {
                receiver.close();
                while let Some((movie_id, patch)) = receiver.recv().await {
                    push(&movies, movie_id, &patch).await;
                }
                break;
            }
        }
    }
    tracing::info!("Review stats publisher stopped");
}

async fn push(movies: &MovieClient, movie_id: DbId, patch: &ReviewStatsPatch) {
    match movies.patch_review_stats(movie_id, patch).await {
        Ok(()) => tracing::debug!(
            movie_id,
            rating_avg = patch.rating_avg,
            review_count = patch.review_count,
            "Review stats pushed"
        ),
        Err(e) => tracing::warn!(
            movie_id,
            error = %e,
            "Review stats push failed; next review mutation will recompute"
        ),
    }
}
