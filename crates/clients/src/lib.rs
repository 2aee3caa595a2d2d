//! Internal client layer.
//!
//! One HTTP client per sibling service, each with a fixed base URL and a
//! bounded per-call timeout, plus the client for the third-party media
//! host. The clients implement the lookup traits from
//! [`reelhub_core::aggregation`] so aggregators stay transport-agnostic.

pub mod actor;
pub mod directory;
pub mod error;
pub mod internal;
pub mod media;
pub mod movie;
pub mod user;

pub use actor::ActorClient;
pub use directory::{ServiceDirectory, ServiceUrls};
pub use error::ClientError;
pub use internal::InternalClient;
pub use media::{HttpMediaHost, MediaConfig};
pub use movie::MovieClient;
pub use user::UserClient;
