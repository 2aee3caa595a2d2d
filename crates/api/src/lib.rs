//! ReelHub service library.
//!
//! Every entity service and the admin aggregator are built from this crate;
//! the `reelhub-service` binary mounts the routes of the service named by
//! `SERVICE_NAME`. Integration tests build the same router through
//! [`router::build_app_router`].

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod upload;
