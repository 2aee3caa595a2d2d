//! The set of sibling clients a service process holds.

use std::time::Duration;

use reelhub_core::service::ServiceName;

use crate::actor::ActorClient;
use crate::error::ClientError;
use crate::internal::InternalClient;
use crate::movie::MovieClient;
use crate::user::UserClient;

/// Base URL of every service, keyed by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUrls {
    pub user: String,
    pub movie: String,
    pub review: String,
    pub playlist: String,
    pub admin: String,
    pub actor: String,
}

impl ServiceUrls {
    /// Read `<NAME>_SERVICE_URL` for each service, falling back to the
    /// in-cluster default.
    pub fn from_env() -> Self {
        let url = |service: ServiceName| {
            std::env::var(service.url_env_var()).unwrap_or_else(|_| service.default_url())
        };
        Self {
            user: url(ServiceName::User),
            movie: url(ServiceName::Movie),
            review: url(ServiceName::Review),
            playlist: url(ServiceName::Playlist),
            admin: url(ServiceName::Admin),
            actor: url(ServiceName::Actor),
        }
    }

    pub fn get(&self, service: ServiceName) -> &str {
        match service {
            ServiceName::User => &self.user,
            ServiceName::Movie => &self.movie,
            ServiceName::Review => &self.review,
            ServiceName::Playlist => &self.playlist,
            ServiceName::Admin => &self.admin,
            ServiceName::Actor => &self.actor,
        }
    }
}

/// Clients for every sibling that exposes internal endpoints.
///
/// All share one connection pool and the same per-call timeout.
#[derive(Debug, Clone)]
pub struct ServiceDirectory {
    pub user: UserClient,
    pub movie: MovieClient,
    pub actor: ActorClient,
    pub review: InternalClient,
}

impl ServiceDirectory {
    pub fn new(urls: &ServiceUrls, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let client = |service: ServiceName| {
            InternalClient::with_client(service, http.clone(), urls.get(service))
        };
        Ok(Self {
            user: UserClient::new(client(ServiceName::User)),
            movie: MovieClient::new(client(ServiceName::Movie)),
            actor: ActorClient::new(client(ServiceName::Actor)),
            review: client(ServiceName::Review),
        })
    }
}
