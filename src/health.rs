//! Keep-alive HTTP endpoint for uptime pingers.

use axum::Router;
use axum::routing::get;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// The keep-alive routes.
pub fn router() -> Router {
    Router::new().route("/", get(|| async { "chat-warden is running" }))
}

/// Bind and serve the keep-alive endpoint in the background.
pub fn spawn(port: u16) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::net::TcpListener::bind(("0.0.0.0", port)).await {
            Ok(listener) => {
                info!(port, "Keep-alive endpoint started");
                axum::serve(listener, router()).await.ok();
            }
            Err(e) => {
                warn!(port, error = %e, "Failed to bind keep-alive endpoint");
            }
        }
    })
}
