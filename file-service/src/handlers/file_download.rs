use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;
use tracing::{error, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::storage::StorageError;
use crate::AppState;

const FUNC: &str = "download_handler";

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Stream a stored file back as an attachment.
pub async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let (file, len) = state.storage.open(&filename).await.map_err(|e| match &e {
        _ if e.is_not_found() => {
            warn!(func = FUNC, filename = %filename, "File not found");
            ApiError::NotFound("File not found".to_string())
        }
        StorageError::InvalidFilename(_) => {
            warn!(func = FUNC, error = %e, "Invalid filename");
            ApiError::BadRequest("Invalid filename".to_string())
        }
        _ => {
            error!(func = FUNC, filename = %filename, error = %e, "Error opening file");
            ApiError::Internal("Error opening file".to_string())
        }
    })?;

    let disposition = HeaderValue::from_str(&format!("attachment; filename={}", filename))
        .map_err(|e| {
            warn!(func = FUNC, filename = %filename, error = %e, "Filename cannot be sent as a header");
            ApiError::BadRequest("Invalid filename".to_string())
        })?;

    info!(func = FUNC, filename = %filename, bytes = len, "File download started");

    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static(OCTET_STREAM)),
        (header::CONTENT_DISPOSITION, disposition),
        (header::CONTENT_LENGTH, HeaderValue::from(len)),
    ];

    Ok((StatusCode::OK, headers, Body::from_stream(ReaderStream::new(file))).into_response())
}
