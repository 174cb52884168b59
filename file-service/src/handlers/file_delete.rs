use axum::extract::{Path, State};
use tracing::{error, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::storage::StorageError;
use crate::AppState;

const FUNC: &str = "delete_handler";

pub const DELETED: &str = "File deleted successfully";

/// Remove a stored file. A missing file is reported like any other failure.
pub async fn delete_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<&'static str> {
    match state.storage.remove(&filename).await {
        Ok(()) => {
            info!(func = FUNC, filename = %filename, "File deleted successfully");
            Ok(DELETED)
        }
        Err(e @ StorageError::InvalidFilename(_)) => {
            warn!(func = FUNC, error = %e, "Invalid filename");
            Err(ApiError::BadRequest("Invalid filename".to_string()))
        }
        Err(e) => {
            error!(func = FUNC, filename = %filename, error = %e, "Error deleting file");
            Err(ApiError::Internal("Error deleting file".to_string()))
        }
    }
}
