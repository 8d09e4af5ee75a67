//! HTTP server setup with Axum

use std::future::Future;
use std::io;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::script::script_handler;
use super::static_files::serve_file;
use super::websocket::{handler::ws_handler, state::AppState};
use crate::error::{Error, Result};

/// Create the Axum router: subscription socket, client script, static files
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(&state.socket_route(), get(ws_handler))
        .route(&state.script_route(), get(script_handler))
        .fallback(serve_file)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves
pub async fn serve(
    addr: &str,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = TcpListener::bind(addr).await.map_err(|source| Error::Bind {
        addr: addr.to_string(),
        source,
    })?;
    info!(addr = %listener.local_addr()?, root = %state.root.display(), "serving");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Resolve when `signal` fires.
///
/// If the signal handler cannot be installed, never resolve: the server keeps
/// running until the process is killed instead of shutting down at startup.
pub async fn shutdown_on(signal: impl Future<Output = io::Result<()>>) {
    if let Err(e) = signal.await {
        error!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
