//! CB-007: HTTP API over a shared registry.
//!
//! - `POST /parse`   normalize a free-text name
//! - `POST /entry`   register an ingredient or recipe
//! - `GET  /summary` cook time and base ingredients for `?name=`
//! - `GET  /health`

pub mod handlers;

use crate::core::Registry;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared handler state. The registry does its own reader-writer locking.
pub type AppState = Arc<Registry>;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/parse", post(handlers::parse))
        .route("/entry", post(handlers::create_entry))
        .route("/summary", get(handlers::summary))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(registry: Registry, addr: &str) -> Result<(), String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("cannot bind {}: {}", addr, e))?;
    let local = listener
        .local_addr()
        .map_err(|e| format!("cannot read local address: {}", e))?;
    info!(addr = %local, entries = registry.len(), "cookbook server listening");

    axum::serve(listener, create_router(Arc::new(registry)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("server error: {}", e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
