//! ReelHub domain types and cross-service composition.
//!
//! This crate is shared by every service binary and holds no I/O of its own:
//!
//! - domain vocabulary ([`roles`], [`movie`], [`activity`], [`principal`]);
//! - the payloads exchanged on internal endpoints ([`contracts`]);
//! - review statistics maths ([`review_stats`]);
//! - the media host contract ([`media`]);
//! - the view aggregators in [`aggregation`], which reach sibling services
//!   only through lookup traits.

pub mod activity;
pub mod aggregation;
pub mod contracts;
pub mod error;
pub mod fanout;
pub mod media;
pub mod movie;
pub mod principal;
pub mod review_stats;
pub mod roles;
pub mod service;
pub mod types;

pub use error::CoreError;
pub use service::ServiceName;
pub use types::{DbId, Timestamp};
