//! Server startup and shutdown logic.
//!
//! This module contains the `run_server` function which handles:
//! - Database and cache initialization
//! - Migration running
//! - Application state creation
//! - Router creation
//! - Server binding and graceful shutdown

use crate::auth::AuthService;
use crate::cache::{RedisCache, UrlCache};
use crate::config::Config;
use crate::db::Repository;
use crate::error::{AppError, AppResult};
use crate::routes;
use crate::services::ShortCodeGenerator;
use crate::state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Run the web server with the given configuration.
///
/// # Errors
///
/// This function will return an error if:
/// - Database connection fails
/// - Migration fails
/// - Server binding fails
/// - Server runtime error occurs
///
/// An unreachable cache is logged but not fatal at startup; requests that
/// touch the cache will fail until it comes back.
pub async fn run_server(config: Config, should_migrate: bool) -> AppResult<()> {
    info!("Starting rustLink server...");

    info!("Connecting to database...");
    let repository = Arc::new(Repository::connect(&config.database).await?);

    if should_migrate {
        info!("Running database migrations...");
        repository.run_migrations().await?;
        info!("Migrations completed successfully");
    }

    info!("Connecting to cache...");
    let cache = Arc::new(RedisCache::new(
        &config.cache.url,
        config.cache.max_connections,
    )?);

    match cache.ping().await {
        Ok(()) => info!("Cache connection verified"),
        Err(e) => warn!("Cache ping failed: {}", e),
    }

    let state = Arc::new(AppState::new(
        repository.clone(),
        repository,
        cache,
        ShortCodeGenerator::from_entropy(),
        config.url.clone(),
        AuthService::from_config(&config.auth),
    ));

    let app = routes::create_router(state, &config.cors);

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to address {}: {}", addr, e)))?;

    info!("Server listening on {}", addr);
    info!("Base URL: {}", config.url.base_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(create_shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create a future that resolves when a shutdown signal is received.
///
/// On Unix-like systems, this listens for both Ctrl+C (SIGINT) and SIGTERM.
/// On other platforms, it only listens for Ctrl+C.
///
/// # Panics
///
/// Panics if signal handler installation fails, since graceful shutdown is
/// impossible without it.
async fn create_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    ctrl_c.await;

    info!("Shutdown signal received");
}
