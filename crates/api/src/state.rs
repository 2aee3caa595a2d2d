use std::sync::Arc;

use reelhub_clients::ServiceDirectory;
use reelhub_core::media::MediaHost;
use reelhub_core::service::ServiceName;
use reelhub_events::ActivityRecorder;

use crate::background::review_stats::ReviewStatsPublisher;
use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is a channel handle.
#[derive(Clone)]
pub struct AppState {
    /// The service this process runs.
    pub service: ServiceName,
    /// Database pool. `None` for services that own no storage.
    pub pool: Option<reelhub_db::DbPool>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Clients for sibling services' internal endpoints.
    pub siblings: Arc<ServiceDirectory>,
    /// Remote image and video storage.
    pub media: Arc<dyn MediaHost>,
    /// Non-blocking activity log submission.
    pub activity: ActivityRecorder,
    /// Queue for review statistic pushes to the movie service.
    pub review_stats: ReviewStatsPublisher,
}

impl AppState {
    /// The service's own database pool.
    pub fn db(&self) -> AppResult<&reelhub_db::DbPool> {
        self.pool.as_ref().ok_or_else(|| {
            AppError::InternalError(format!("The {} service has no database", self.service))
        })
    }
}
