//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the table row
//! - Create/update DTOs consumed by the matching repository
//! - Conversions into the projections other services see

pub mod activity_log;
pub mod actor;
pub mod movie;
pub mod playlist;
pub mod review;
pub mod user;
