//! Core data structures for the template repository

use serde::Serialize;
use time::OffsetDateTime;

/// One stored template: metadata only, the content lives in the blob store.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateRecord {
    /// Catalog-assigned id, unique and immutable
    pub id: i64,

    /// Original filename as supplied by the uploader. Opaque; never used for
    /// storage addressing.
    pub display_name: String,

    /// Declared media type, if the uploader provided one
    pub content_type: Option<String>,

    /// Length of the stored blob in bytes
    pub size_bytes: i64,

    /// Set once when the upload commits
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,

    /// Opaque key addressing the blob. Internal; never serialized.
    #[serde(skip_serializing)]
    pub storage_key: String,
}

/// A record about to be inserted. The catalog assigns the id.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub display_name: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub uploaded_at: OffsetDateTime,
    pub storage_key: String,
}

impl NewRecord {
    /// Materialize the full record once the catalog has assigned an id
    pub fn into_record(self, id: i64) -> TemplateRecord {
        TemplateRecord {
            id,
            display_name: self.display_name,
            content_type: self.content_type,
            size_bytes: self.size_bytes,
            uploaded_at: self.uploaded_at,
            storage_key: self.storage_key,
        }
    }
}
