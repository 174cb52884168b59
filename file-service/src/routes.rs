use axum::{
    extract::DefaultBodyLimit,
    routing::{self, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{file_delete, file_download, file_upload, health, shutdown};
use crate::AppState;

/// Build the router with every route the service exposes.
///
/// Anything else falls through to axum's defaults: 404 for unknown paths,
/// 405 for a known path with the wrong method.
///
/// Uploads are streamed to disk, so without `max_upload_bytes` the upload
/// body is not limited at all.
pub fn create_router(state: AppState, max_upload_bytes: Option<usize>) -> Router {
    let upload_limit = match max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/ping", get(health::ping))
        .route(
            "/upload",
            post(file_upload::upload_file).layer(upload_limit),
        )
        .route("/download/:filename", get(file_download::download_file))
        .route("/delete/:filename", routing::delete(file_delete::delete_file))
        .route("/shutdown", post(shutdown::shutdown_server))
        // Handlers log their own outcome; the trace layer only contributes debug spans.
        .layer(TraceLayer::new_for_http().on_failure(()))
        .with_state(state)
}
