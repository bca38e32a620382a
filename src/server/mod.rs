//! HTTP surface of the rotation daemon.
//!
//! The daemon is the server-side alternative to client-side probing: a
//! trusted intermediary runs the same resolution cycle and hands the
//! front-end one working mirror, so probing traffic never originates from
//! the client network.
//!
//! # Endpoints
//! ```text
//! GET /?action=get-working-domain
//!     200 {"success": true,  "domain": "<url>"}
//!     503 {"success": false, "message": "..."}   (exhausted / config error)
//! GET /                     informational message
//! GET /status               last committed rotation-state snapshot
//! ```

pub mod handlers;

use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::scheduler::RotatorHandle;

/// State injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub rotator: RotatorHandle,
}

pub fn build_router(rotator: RotatorHandle) -> Router {
    // The request timeout must outlive a full scan of a long mirror list
    // (candidates × probe timeout), so it is generous.
    Router::new()
        .route("/", get(handlers::rotate))
        .route("/status", get(handlers::status))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(120)))
        .with_state(AppState { rotator })
}

/// Serve the daemon API until shutdown.
pub async fn run(
    listener: TcpListener,
    rotator: RotatorHandle,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    let router = build_router(rotator);
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
}
