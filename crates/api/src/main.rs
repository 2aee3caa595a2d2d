use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelhub_api::background::review_stats::ReviewStatsPublisher;
use reelhub_api::config::ServerConfig;
use reelhub_api::router::build_app_router;
use reelhub_api::state::AppState;
use reelhub_clients::{HttpMediaHost, ServiceDirectory};
use reelhub_events::{activity_channel, ActivityPersistence, PgActivitySink};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelhub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let service = config.service;
    tracing::info!(%service, host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = match config.database_url.as_deref() {
        Some(database_url) if service.owns_storage() => {
            let pool = reelhub_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            reelhub_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            reelhub_db::run_migrations(&pool, service)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");
            Some(pool)
        }
        _ => None,
    };

    // --- Sibling services ---
    let call_timeout = Duration::from_secs(config.internal_call_timeout_secs);
    let siblings = ServiceDirectory::new(&config.service_urls, call_timeout)
        .expect("Failed to build internal HTTP clients");
    let media = HttpMediaHost::new(config.media.clone(), call_timeout)
        .expect("Failed to build media host client");

    std::fs::create_dir_all(&config.upload_staging_dir)
        .expect("Failed to create upload staging directory");

    // --- Background workers ---
    let cancel = CancellationToken::new();

    let (activity, activity_rx) =
        activity_channel(service, reelhub_events::recorder::DEFAULT_CAPACITY);
    let persistence_handle = pool.clone().map(|pool| {
        tokio::spawn(ActivityPersistence::run(
            PgActivitySink::new(pool),
            activity_rx,
            cancel.clone(),
        ))
    });

    let (review_stats, stats_handle) =
        ReviewStatsPublisher::spawn(siblings.movie.clone(), cancel.clone());
    tracing::info!("Background workers started (activity persistence, review stats)");

    // --- App state ---
    let state = AppState {
        service,
        pool,
        config: Arc::new(config.clone()),
        siblings: Arc::new(siblings),
        media: Arc::new(media),
        activity,
        review_stats,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, %service, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, draining workers");
    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), stats_handle).await;
    if let Some(handle) = persistence_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
