//! rmauth backend server
//!
//! Serves the authentication, profile and requisites API over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;

use rmauth_server::app::{build_router, configure_cors};
use rmauth_server::config::Config;
use rmauth_server::middleware;
use rmauth_server::state::AppState;
use rmauth_server::store::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(environment = config.environment.as_str(), "Starting rmauth server");

    let store: Arc<dyn Store> = match (&config.database_url, config.database_url_masked()) {
        (Some(url), Some(masked)) => {
            tracing::info!("Connecting to database at {}", masked);
            let store = PgStore::connect(url, config.db_max_connections).await?;
            store.migrate().await?;
            Arc::new(store)
        }
        _ => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let app_state = AppState::new(
        store,
        config.jwt_secret.clone(),
        config.jwt_access_token_ttl_seconds,
        config.bcrypt_cost,
    );

    let mut app = build_router(app_state)
        .layer(configure_cors(config.cors_allowed_origins.as_deref()));
    if config.environment.is_production() {
        app = app.layer(axum::middleware::from_fn(middleware::hsts_header));
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
