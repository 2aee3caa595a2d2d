//! Names of the independently deployed services.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One of the services fronted by the gateway.
///
/// The lowercase name doubles as the public path segment (`/api/<name>/...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceName {
    User,
    Movie,
    Review,
    Playlist,
    Admin,
    Actor,
}

impl ServiceName {
    pub const ALL: [ServiceName; 6] = [
        ServiceName::User,
        ServiceName::Movie,
        ServiceName::Review,
        ServiceName::Playlist,
        ServiceName::Admin,
        ServiceName::Actor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceName::User => "user",
            ServiceName::Movie => "movie",
            ServiceName::Review => "review",
            ServiceName::Playlist => "playlist",
            ServiceName::Admin => "admin",
            ServiceName::Actor => "actor",
        }
    }

    /// Port each service listens on when nothing else is configured.
    pub fn default_port(self) -> u16 {
        match self {
            ServiceName::User => 8001,
            ServiceName::Movie => 8002,
            ServiceName::Review => 8003,
            ServiceName::Playlist => 8004,
            ServiceName::Admin => 8005,
            ServiceName::Actor => 8006,
        }
    }

    /// Base URL used when the `<NAME>_SERVICE_URL` variable is unset.
    pub fn default_url(self) -> String {
        format!("http://{}-service:{}", self.as_str(), self.default_port())
    }

    /// Environment variable holding this service's base URL.
    pub fn url_env_var(self) -> &'static str {
        match self {
            ServiceName::User => "USER_SERVICE_URL",
            ServiceName::Movie => "MOVIE_SERVICE_URL",
            ServiceName::Review => "REVIEW_SERVICE_URL",
            ServiceName::Playlist => "PLAYLIST_SERVICE_URL",
            ServiceName::Admin => "ADMIN_SERVICE_URL",
            ServiceName::Actor => "ACTOR_SERVICE_URL",
        }
    }

    /// Whether this service owns a table set and therefore needs a database.
    pub fn owns_storage(self) -> bool {
        !matches!(self, ServiceName::Admin)
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown service '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_name() {
        for name in ServiceName::ALL {
            assert_eq!(name.as_str().parse::<ServiceName>().unwrap(), name);
        }
    }

    #[test]
    fn default_url_uses_compose_hostnames() {
        assert_eq!(ServiceName::Review.default_url(), "http://review-service:8003");
    }

    #[test]
    fn admin_has_no_storage() {
        assert!(!ServiceName::Admin.owns_storage());
        assert!(ServiceName::Playlist.owns_storage());
    }
}
