use tracing::info;

pub const PONG: &str = "Pong! Server is up and running.";

/// Liveness probe. Always answers, whatever the state of storage.
pub async fn ping() -> &'static str {
    info!(func = "ping_handler", "Received ping request.");
    PONG
}
