//! Submission side of the activity log.

use reelhub_core::activity::ActivityAction;
use reelhub_core::service::ServiceName;
use reelhub_core::types::DbId;
use reelhub_db::models::activity_log::NewActivityLog;
use serde::Serialize;
use tokio::sync::mpsc;

/// Default buffer capacity for the submission channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Client metadata attached to every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// The action belongs to another service's log.
    #[error("{action} is not recorded by the {service} service")]
    ForeignAction {
        action: ActivityAction,
        service: ServiceName,
    },

    /// The buffer is full; the entry was dropped.
    #[error("Activity log buffer is full")]
    Full,

    /// The persistence worker has stopped.
    #[error("Activity log worker is not running")]
    Closed,
}

/// Create a recorder for `service` and the receiver its worker drains.
pub fn activity_channel(
    service: ServiceName,
    capacity: usize,
) -> (ActivityRecorder, mpsc::Receiver<NewActivityLog>) {
    let (sender, receiver) = mpsc::channel(capacity);
    (ActivityRecorder { service, sender }, receiver)
}

/// Cheap, cloneable handle for submitting activity entries.
///
/// [`record`](Self::record) never waits on storage. A dropped entry is
/// logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct ActivityRecorder {
    service: ServiceName,
    sender: mpsc::Sender<NewActivityLog>,
}

impl ActivityRecorder {
    pub fn service(&self) -> ServiceName {
        self.service
    }

    /// Submit an entry. `details` is serialized to JSON as given, so callers
    /// pass a payload with secrets already stripped.
    pub fn record<D: Serialize>(
        &self,
        user_id: DbId,
        action: ActivityAction,
        details: &D,
        meta: &RequestMeta,
    ) -> Result<(), RecordError> {
        if action.owner() != self.service {
            tracing::warn!(%action, service = %self.service, "Refusing foreign activity action");
            return Err(RecordError::ForeignAction {
                action,
                service: self.service,
            });
        }

        let entry = NewActivityLog {
            user_id: Some(user_id),
            action,
            details: serde_json::to_string(details).ok(),
            ip: meta.ip.clone(),
            user_agent: meta.user_agent.clone(),
        };

        self.sender.try_send(entry).map_err(|e| {
            let err = match e {
                mpsc::error::TrySendError::Full(_) => RecordError::Full,
                mpsc::error::TrySendError::Closed(_) => RecordError::Closed,
            };
            tracing::warn!(%action, error = %err, "Activity log entry dropped");
            err
        })
    }
}
