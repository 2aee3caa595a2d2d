//! ReelHub API gateway.
//!
//! Forwards `/api/{service}/...` to the owning service unchanged and refuses
//! every path that names an internal endpoint. Services trust that nothing
//! outside the cluster reaches `/internal/` routes, so the guard runs before
//! any routing decision.

pub mod config;
pub mod guard;
pub mod proxy;
pub mod router;
