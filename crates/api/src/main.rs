use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use kickflip_core::service::FunnelService;
use kickflip_core::session::SessionStore;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kickflip_api::config::{LogFormat, ServerConfig};
use kickflip_api::router::build_app_router;
use kickflip_api::state::AppState;
use kickflip_db::{FileSessionStore, InMemoryFunnelService, PgFunnelService};

const DEFAULT_LOG_FILTER: &str =
    "kickflip_api=debug,kickflip_core=info,kickflip_db=info,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Funnel store ---
    let (service, pool) = match &config.database_url {
        Some(database_url) => {
            let pool = kickflip_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            kickflip_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            kickflip_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            (
                Arc::new(PgFunnelService::new(pool.clone())) as Arc<dyn FunnelService>,
                Some(pool),
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set, funnels are kept in memory");
            (
                Arc::new(InMemoryFunnelService::new()) as Arc<dyn FunnelService>,
                None,
            )
        }
    };

    // --- Session store ---
    let session_store: Arc<dyn SessionStore> =
        Arc::new(FileSessionStore::new(config.session_file.clone()));
    tracing::info!(path = %config.session_file.display(), "Using file session store");

    // --- App state ---
    let advisory = AppState::advisory_from_config(&config);
    let state = AppState::initialise(
        config.clone(),
        service,
        session_store,
        advisory,
        pool.clone(),
    )
    .await;

    // --- Workspace event log ---
    let mut events = state.workspace.subscribe();
    let event_log_handle = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::debug!(?event, "Workspace event"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Workspace event log lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    event_log_handle.abort();
    if let Some(pool) = pool {
        let drain = Duration::from_secs(config.shutdown_timeout_secs);
        if tokio::time::timeout(drain, pool.close()).await.is_err() {
            tracing::warn!(
                timeout_secs = config.shutdown_timeout_secs,
                "Database pool did not close in time"
            );
        }
    }
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
