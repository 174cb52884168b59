use anyhow::{Context, Result};
use shared::observability::init_logging;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

mod config;
mod error;
mod handlers;
mod routes;
mod server;
mod shutdown;
mod storage;
#[cfg(test)]
mod test_support;

use config::Config;
use shutdown::Shutdown;
use storage::FileStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<FileStore>,
    pub shutdown: Shutdown,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let log_config = config.logging.to_log_config()?;
    let log_guard = init_logging(&log_config).context("Failed to open the log file")?;

    let result = run(config).await;
    if let Err(e) = &result {
        error!(main = "startup", error = %format!("{:#}", e), "File Service terminated");
    }

    // Flush buffered log records before the process exits.
    drop(log_guard);
    result
}

async fn run(config: Config) -> Result<()> {
    info!(
        main = "start",
        "Starting File Service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let storage = FileStore::new(&config.storage.upload_dir);
    storage
        .ensure_directory()
        .await
        .context("Error creating upload directory")?;
    info!(
        main = "create uploads folder",
        path = %storage.root().display(),
        "Upload directory ready"
    );

    let shutdown = Shutdown::new();
    let state = AppState {
        storage: Arc::new(storage),
        shutdown: shutdown.clone(),
    };
    let app = routes::create_router(state, config.server.max_upload_bytes);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!(main = "shutdown", "Shutdown signal received");
                ctrl_c.trigger();
            }
            Err(e) => warn!(main = "shutdown", error = %e, "Failed to listen for shutdown signal"),
        }
    });

    info!(main = "start server", address = %addr, "Server started on {}", addr);
    server::serve(listener, app, shutdown, config.server.shutdown_mode).await
}
