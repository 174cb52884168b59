// Local filesystem storage: one flat directory, one file per uploaded name

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::debug;

use super::{StorageError, StorageResult};

/// Flat directory of files keyed by filename.
///
/// There is no locking: concurrent writers to the same name race at the
/// filesystem level and the last one to finish wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage directory and any missing parents.
    pub async fn ensure_directory(&self) -> StorageResult<()> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(0o777); // read, write and execute, subject to umask

        builder
            .create(&self.root)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: self.root.clone(),
                source,
            })
    }

    /// Resolve a client supplied filename inside the storage directory.
    ///
    /// Names are used verbatim, but anything that could address a path
    /// outside the directory is refused.
    pub fn path_for(&self, filename: &str) -> StorageResult<PathBuf> {
        if filename.is_empty()
            || filename == "."
            || filename == ".."
            || filename.contains(['/', '\\', '\0'])
        {
            return Err(StorageError::InvalidFilename(filename.to_string()));
        }
        Ok(self.root.join(filename))
    }

    /// Create (or truncate) `filename` and copy the whole reader into it.
    pub async fn store<R>(&self, filename: &str, reader: &mut R) -> StorageResult<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let path = self.path_for(filename)?;

        let mut file = fs::File::create(&path)
            .await
            .map_err(|source| StorageError::Create {
                name: filename.to_string(),
                source,
            })?;

        let write_err = |source: std::io::Error| StorageError::Write {
            name: filename.to_string(),
            source,
        };
        let written = tokio::io::copy(reader, &mut file).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)?;

        debug!(filename, bytes = written, "Stored file");
        Ok(written)
    }

    /// Open `filename` for reading, returning the handle and its length.
    pub async fn open(&self, filename: &str) -> StorageResult<(fs::File, u64)> {
        let path = self.path_for(filename)?;
        let open_err = |source: std::io::Error| {
            if source.kind() == ErrorKind::NotFound {
                StorageError::NotFound(filename.to_string())
            } else {
                StorageError::Open {
                    name: filename.to_string(),
                    source,
                }
            }
        };

        let file = fs::File::open(&path).await.map_err(open_err)?;
        let metadata = file.metadata().await.map_err(open_err)?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound(filename.to_string()));
        }

        Ok((file, metadata.len()))
    }

    /// Delete `filename`.
    pub async fn remove(&self, filename: &str) -> StorageResult<()> {
        let path = self.path_for(filename)?;
        fs::remove_file(&path).await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                StorageError::NotFound(filename.to_string())
            } else {
                StorageError::Remove {
                    name: filename.to_string(),
                    source,
                }
            }
        })
    }
}
