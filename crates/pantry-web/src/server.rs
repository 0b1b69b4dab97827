//! Server loop.

use anyhow::Context;
use tokio::net::TcpListener;

use crate::router::app_router;
use crate::state::AppState;

/// Bind `host:port` and serve until Ctrl-C.
pub async fn serve(host: &str, port: u16, state: AppState) -> anyhow::Result<()> {
    let listener = bind(host, port).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

/// Resolve `host` (an IP literal or a hostname, IPv4 or IPv6) and bind the
/// first address that accepts.
pub async fn bind(host: &str, port: u16) -> anyhow::Result<TcpListener> {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    TcpListener::bind((host, port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
