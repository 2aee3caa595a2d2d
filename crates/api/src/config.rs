use std::path::PathBuf;

use reelhub_clients::{MediaConfig, ServiceUrls};
use reelhub_core::service::ServiceName;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the service name, database URL and JWT secret have
/// defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Which service this process runs.
    pub service: ServiceName,
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: the service's own port).
    pub port: u16,
    /// Postgres URL. `None` only for services that own no storage.
    pub database_url: Option<String>,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Per-call timeout for sibling services in seconds (default: `10`).
    pub internal_call_timeout_secs: u64,
    /// Direct base URLs of every sibling service.
    pub service_urls: ServiceUrls,
    /// JWT token configuration.
    pub jwt: JwtConfig,
    /// Mark new accounts verified on signup (default: `true`).
    pub auto_verify_signups: bool,
    /// Media host credentials.
    pub media: MediaConfig,
    /// Where multipart uploads are staged before being sent to the media host.
    pub upload_staging_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                            |
    /// |------------------------------|------------------------------------|
    /// | `SERVICE_NAME`               | **required**                       |
    /// | `HOST`                       | `0.0.0.0`                          |
    /// | `PORT`                       | per service (8001..8006)           |
    /// | `DATABASE_URL`               | **required** unless `admin`        |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`            |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                               |
    /// | `INTERNAL_CALL_TIMEOUT_SECS` | `10`                               |
    /// | `<NAME>_SERVICE_URL`         | `http://<name>-service:<port>`     |
    /// | `AUTO_VERIFY_SIGNUPS`        | `true`                             |
    /// | `UPLOAD_STAGING_DIR`         | `/tmp/reelhub-uploads`             |
    ///
    /// JWT and media variables are documented on [`JwtConfig::from_env`] and
    /// [`MediaConfig::from_env`].
    pub fn from_env() -> Self {
        let service: ServiceName = std::env::var("SERVICE_NAME")
            .expect("SERVICE_NAME must be set")
            .parse()
            .expect("SERVICE_NAME must name a known service");

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| service.default_port().to_string())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url = std::env::var("DATABASE_URL").ok();
        assert!(
            database_url.is_some() || !service.owns_storage(),
            "DATABASE_URL must be set for the {service} service"
        );

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let internal_call_timeout_secs: u64 = std::env::var("INTERNAL_CALL_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("INTERNAL_CALL_TIMEOUT_SECS must be a valid u64");

        let auto_verify_signups: bool = std::env::var("AUTO_VERIFY_SIGNUPS")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("AUTO_VERIFY_SIGNUPS must be true or false");

        let upload_staging_dir = std::env::var("UPLOAD_STAGING_DIR")
            .unwrap_or_else(|_| "/tmp/reelhub-uploads".into())
            .into();

        Self {
            service,
            host,
            port,
            database_url,
            cors_origins,
            request_timeout_secs,
            internal_call_timeout_secs,
            service_urls: ServiceUrls::from_env(),
            jwt: JwtConfig::from_env(),
            auto_verify_signups,
            media: MediaConfig::from_env(),
            upload_staging_dir,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            parse_origins(" http://a.test ,, http://b.test"),
            vec!["http://a.test", "http://b.test"]
        );
    }
}
