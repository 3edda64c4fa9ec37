//! Filesystem-backed blob storage
//!
//! One file per storage key under a flat base directory. Keys are generated
//! by the repository (UUIDs), never derived from user-supplied names, so a
//! key maps to a path by plain join. Anything that could still escape the
//! base directory is rejected as an invalid key.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{BlobStorage, StorageError};

/// Blob storage over a local directory
pub struct FsBlobStorage {
    base_path: PathBuf,
}

impl FsBlobStorage {
    /// Create the storage, creating the base directory if missing
    pub async fn new(base_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::Unavailable(format!(
                "Failed to create blob directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(Self { base_path })
    }

    fn blob_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.contains('/') || key.contains('\\') || key.contains("..") {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(key))
    }
}

#[async_trait]
impl BlobStorage for FsBlobStorage {
    async fn put(&self, key: &str, data: Vec<u8>) -> Result<(), StorageError> {
        let path = self.blob_path(key)?;

        fs::write(&path, data)
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to write blob {}: {}", key, e)))
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.blob_path(key)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::Backend(format!(
                "Failed to read blob {}: {}",
                key, e
            ))),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.blob_path(key)?;

        fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to stat blob {}: {}", key, e)))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.blob_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Absent key: already gone, nothing to do.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Backend(format!(
                "Failed to delete blob {}: {}",
                key, e
            ))),
        }
    }
}
