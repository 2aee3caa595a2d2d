//! Fire-and-forget activity logging.
//!
//! - [`ActivityRecorder`]: cloneable handle handlers use to submit entries
//!   without awaiting storage.
//! - [`ActivityPersistence`]: background worker draining the recorder's
//!   channel into the service's `activity_logs` table.
//! - [`ActivitySink`]: the storage seam the worker writes through.

pub mod persistence;
pub mod recorder;

pub use persistence::{ActivityPersistence, ActivitySink, PgActivitySink};
pub use recorder::{activity_channel, ActivityRecorder, RecordError, RequestMeta};
