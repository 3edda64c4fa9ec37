//! Atomic template operations over the blob store and metadata catalog
//!
//! [`TemplateRepository`] is the sole writer to both stores and owns the
//! referential invariant: every catalog record points at exactly one
//! retrievable blob, and no blob outlives a failed or deleted record.
//! Operations on distinct ids run concurrently without interference;
//! operations on one id are serialized through the catalog's atomic row
//! removal.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::{RepositoryError, Result};
use crate::record::{NewRecord, TemplateRecord};
use crate::storage::{BlobStorage, MetadataCatalog, StorageError};

/// The template repository: blob store + metadata catalog composed into
/// referentially-consistent upload/list/fetch/delete operations.
pub struct TemplateRepository {
    blobs: Arc<dyn BlobStorage>,
    catalog: Arc<dyn MetadataCatalog>,
}

impl TemplateRepository {
    /// Create a repository over the given storage backends
    pub fn new(blobs: Arc<dyn BlobStorage>, catalog: Arc<dyn MetadataCatalog>) -> Self {
        Self { blobs, catalog }
    }

    /// Store a new template: blob write first, then the metadata record.
    ///
    /// If the record insert fails after the blob write succeeded, the blob is
    /// removed again, so a failed upload leaves nothing behind.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        display_name: &str,
        content_type: Option<String>,
    ) -> Result<TemplateRecord> {
        if bytes.is_empty() {
            return Err(RepositoryError::InvalidInput("Empty upload".into()));
        }
        if display_name.is_empty() {
            return Err(RepositoryError::InvalidInput("Missing file name".into()));
        }

        let size_bytes = bytes.len() as i64;
        let storage_key = Uuid::new_v4().to_string();

        self.blobs
            .put(&storage_key, bytes)
            .await
            .map_err(storage_error)?;

        let new_record = NewRecord {
            display_name: display_name.to_string(),
            content_type,
            size_bytes,
            uploaded_at: OffsetDateTime::now_utc(),
            storage_key,
        };

        let id = match self.catalog.insert(&new_record).await {
            Ok(id) => id,
            Err(e) => {
                // Compensating delete: the blob must not outlive the failed
                // insert.
                if let Err(cleanup) = self.blobs.delete(&new_record.storage_key).await {
                    error!(
                        storage_key = %new_record.storage_key,
                        error = %cleanup,
                        "Failed to remove blob after catalog insert error"
                    );
                }
                return Err(storage_error(e));
            }
        };

        Ok(new_record.into_record(id))
    }

    /// All current records in insertion order. Metadata only, no content.
    pub async fn list(&self) -> Result<Vec<TemplateRecord>> {
        self.catalog.list_all().await.map_err(storage_error)
    }

    /// Look up a record and read its blob.
    ///
    /// A record whose blob is missing is reported as not found. That state is
    /// either a concurrent delete that already removed the blob, or an
    /// integrity violation; only the latter is logged.
    pub async fn fetch(&self, id: i64) -> Result<(TemplateRecord, Vec<u8>)> {
        let record = self
            .catalog
            .get_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or(RepositoryError::NotFound(id))?;

        match self.blobs.get(&record.storage_key).await {
            Ok(bytes) => Ok((record, bytes)),
            Err(StorageError::NotFound(_)) => {
                // A concurrent delete removes the blob before the row. Only a
                // record that is still present points at a truly missing blob.
                let still_present = self
                    .catalog
                    .get_by_id(id)
                    .await
                    .map_err(storage_error)?
                    .is_some();
                if still_present {
                    warn!(
                        id,
                        storage_key = %record.storage_key,
                        "Integrity anomaly: record present but blob missing"
                    );
                }
                Err(RepositoryError::NotFound(id))
            }
            Err(e) => Err(storage_error(e)),
        }
    }

    /// Remove a template: blob first, then the metadata row.
    ///
    /// If the blob delete fails, the row is left intact and the template
    /// stays fetchable, so the delete can be retried. When two deletes race
    /// on one id, the catalog's atomic row removal picks the winner; the
    /// loser reports not found.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let record = self
            .catalog
            .get_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or(RepositoryError::NotFound(id))?;

        // Idempotent at the blob layer: an already-absent blob is fine, any
        // other failure aborts with the record untouched.
        self.blobs
            .delete(&record.storage_key)
            .await
            .map_err(storage_error)?;

        if self.catalog.delete_by_id(id).await.map_err(storage_error)? {
            Ok(())
        } else {
            Err(RepositoryError::NotFound(id))
        }
    }
}

fn storage_error(e: StorageError) -> RepositoryError {
    match e {
        StorageError::Unavailable(msg) => RepositoryError::Unavailable(msg),
        other => RepositoryError::Storage(other.to_string()),
    }
}
