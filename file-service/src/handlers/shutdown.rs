use axum::extract::State;
use tracing::info;

use crate::AppState;

pub const SHUTTING_DOWN: &str = "Shutting down server...";

/// Acknowledge the request and signal the accept loop to stop.
///
/// The acknowledgement is still delivered: the server only stops once this
/// response has been handed to the connection.
pub async fn shutdown_server(State(state): State<AppState>) -> &'static str {
    info!(func = "shutdown_handler", "Received shutdown request.");
    state.shutdown.trigger();
    SHUTTING_DOWN
}
