//! HTTP handlers, one module per service.

pub mod actor;
pub mod admin;
pub mod internal;
pub mod movie;
pub mod playlist;
pub mod review;
pub mod user;

use reelhub_core::activity::ActivityAction;
use reelhub_core::types::DbId;
use reelhub_events::RequestMeta;
use serde::Serialize;

use crate::state::AppState;

/// Submit an activity entry without waiting on storage.
///
/// A rejected entry is already logged by the recorder and never fails the
/// request that produced it.
pub(crate) fn record_activity<D: Serialize>(
    state: &AppState,
    user_id: DbId,
    action: ActivityAction,
    details: &D,
    meta: &RequestMeta,
) {
    let _ = state.activity.record(user_id, action, details, meta);
}
