//! Accept loop with a controllable stop.

use std::future::IntoFuture;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ShutdownMode;
use crate::shutdown::Shutdown;

/// How long an immediate shutdown waits so the `/shutdown` acknowledgement
/// can reach the client before in-flight work is dropped.
pub const ACK_FLUSH_WINDOW: Duration = Duration::from_millis(100);

/// Serve `app` on `listener` until `shutdown` is triggered.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: Shutdown,
    mode: ShutdownMode,
) -> Result<()> {
    let signal = shutdown.clone();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move { signal.wait().await })
        .into_future();

    match mode {
        ShutdownMode::Graceful => server.await.context("Server error")?,
        ShutdownMode::Immediate => {
            tokio::select! {
                result = server => result.context("Server error")?,
                _ = async {
                    shutdown.wait().await;
                    tokio::time::sleep(ACK_FLUSH_WINDOW).await;
                } => {
                    warn!(main = "shutdown", "Dropping in-flight requests");
                }
            }
        }
    }

    info!(main = "shutdown", mode = ?mode, "Server stopped");
    Ok(())
}
