//! Liveness endpoint
//!
//! Hosting platforms probe `GET /` to decide whether the process is alive.
//! It runs beside the dispatcher and knows nothing about the bot itself.

use anyhow::Result;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tracing::info;

/// Body returned by `GET /`.
pub const HEALTH_BODY: &str = "Telegram bot is running!";

/// Router with the liveness route.
#[must_use]
pub fn router() -> Router {
    Router::new().route("/", get(root))
}

async fn root() -> &'static str {
    HEALTH_BODY
}

/// Serve the liveness endpoint on all interfaces until the process exits.
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails.
pub async fn serve(port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Telegram bot server running on port {port}");

    axum::serve(listener, router()).await?;
    Ok(())
}
