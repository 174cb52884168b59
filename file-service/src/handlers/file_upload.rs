use std::io;

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
};
use futures::TryStreamExt;
use tokio_util::io::StreamReader;
use tracing::{error, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::storage::{FileStore, StorageError};
use crate::AppState;

const FUNC: &str = "upload_handler";

/// Form field that carries the uploaded file.
pub const FILE_FIELD: &str = "file";

pub const UPLOADED: &str = "File uploaded successfully";

fn bad_request() -> ApiError {
    ApiError::BadRequest("Error getting file".to_string())
}

fn too_large() -> ApiError {
    ApiError::PayloadTooLarge("File too large".to_string())
}

fn multipart_failure(err: &MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large()
    } else {
        bad_request()
    }
}

/// True when a copy failed because the request body went over the upload limit.
fn exceeded_body_limit(err: &io::Error) -> bool {
    err.get_ref()
        .and_then(|inner| inner.downcast_ref::<MultipartError>())
        .map_or(false, |e| e.status() == StatusCode::PAYLOAD_TOO_LARGE)
}

/// Handle a multipart upload.
///
/// The `file` part is streamed to disk under the filename the client sent,
/// replacing any existing file with that name. Other parts are ignored.
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<&'static str> {
    let mut multipart = multipart.map_err(|e| {
        warn!(func = FUNC, error = %e, "Error getting file");
        bad_request()
    })?;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                warn!(func = FUNC, "Error getting file: no '{}' field in form", FILE_FIELD);
                return Err(bad_request());
            }
            Err(e) => {
                warn!(func = FUNC, error = %e, "Error getting file");
                return Err(multipart_failure(&e));
            }
        };

        if field.name() == Some(FILE_FIELD) {
            return save_field(&state, field).await;
        }
    }
}

async fn save_field(state: &AppState, field: Field<'_>) -> ApiResult<&'static str> {
    let filename = match field.file_name() {
        Some(name) => name.to_string(),
        None => {
            warn!(func = FUNC, "Error getting file: part has no filename");
            return Err(bad_request());
        }
    };

    let reader = StreamReader::new(field.map_err(|e| io::Error::new(io::ErrorKind::Other, e)));
    tokio::pin!(reader);

    match state.storage.store(&filename, &mut reader).await {
        Ok(bytes) => {
            info!(func = FUNC, filename = %filename, bytes, "File uploaded successfully");
            Ok(UPLOADED)
        }
        Err(e @ StorageError::InvalidFilename(_)) => {
            warn!(func = FUNC, error = %e, "Error getting file");
            Err(bad_request())
        }
        Err(e @ StorageError::Write { .. }) => {
            discard_partial(&state.storage, &filename).await;

            let over_limit = matches!(&e, StorageError::Write { source, .. } if exceeded_body_limit(source));
            if over_limit {
                warn!(func = FUNC, filename = %filename, error = %e, "Error copying file: upload too large");
                Err(too_large())
            } else {
                error!(func = FUNC, filename = %filename, error = %e, "Error copying file");
                Err(ApiError::Internal("Error copying file".to_string()))
            }
        }
        Err(e) => {
            error!(func = FUNC, filename = %filename, error = %e, "Error creating file");
            Err(ApiError::Internal("Error creating file".to_string()))
        }
    }
}

/// Remove a file whose copy failed so no truncated upload is served later.
async fn discard_partial(storage: &FileStore, filename: &str) {
    if let Err(e) = storage.remove(filename).await {
        warn!(
            func = FUNC,
            filename = %filename,
            error = %e,
            "Partial file left behind after failed copy"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::LogCapture;

    async fn temp_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("uploads"));
        store.ensure_directory().await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_discard_partial_removes_file_quietly() {
        let (_dir, store) = temp_store().await;
        store.store("half.bin", &mut &b"half of it"[..]).await.unwrap();

        let logs = LogCapture::start();
        discard_partial(&store, "half.bin").await;
        let records = logs.finish();

        assert!(!store.root().join("half.bin").exists());
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_discard_partial_logs_failed_cleanup() {
        let (_dir, store) = temp_store().await;
        // A directory in place of the file makes the removal fail.
        std::fs::create_dir(store.root().join("stuck.bin")).unwrap();

        let logs = LogCapture::start();
        discard_partial(&store, "stuck.bin").await;
        let records = logs.finish();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["func"], FUNC);
        assert_eq!(records[0]["level"], "WARN");
        assert_eq!(records[0]["filename"], "stuck.bin");
        assert_eq!(
            records[0]["message"],
            "Partial file left behind after failed copy"
        );
    }
}
