// Storage module for the flat upload directory

pub mod local_fs;

pub use local_fs::FileStore;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the storage accessor.
///
/// The I/O variants all carry the underlying `io::Error`; they differ only
/// in which step failed so the handlers can log it precisely.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Error creating directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error creating file {name}: {source}")]
    Create {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Error copying file {name}: {source}")]
    Write {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Error opening file {name}: {source}")]
    Open {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Error deleting file {name}: {source}")]
    Remove {
        name: String,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
