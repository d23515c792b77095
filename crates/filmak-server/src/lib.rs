//! filmak-server: data-source clients, the movie catalog and the HTTP server.
//!
//! This crate provides:
//!
//! - TMDB and Supabase (PostgREST) clients
//! - The [`catalog::Catalog`] fallback chain over those sources
//! - The admin "add movie" action
//! - Server-rendered HTML pages and a small JSON API on Axum
//! - Graceful shutdown via signal handling

pub mod admin;
pub mod catalog;
pub mod context;
pub mod error;
pub mod middleware;
pub mod placeholder;
pub mod router;
pub mod routes;
pub mod supabase;
pub mod tmdb;
pub mod views;

use filmak_core::config::Config;

use crate::context::AppContext;

/// Start the Filmak server and run until a shutdown signal arrives.
pub async fn start(config: Config) -> filmak_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let static_dir = config.server.static_dir.clone();

    let ctx = AppContext::new(config);
    let app = router::build_router(ctx, static_dir);

    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| filmak_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    if let Ok(local) = listener.local_addr() {
        tracing::info!("Listening on http://{local}");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| filmak_core::Error::Internal(format!("Server error: {e}")))?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
