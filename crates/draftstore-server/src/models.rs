//! API request/response models
//!
//! Wire types are separate from the core record, so the internal storage key
//! has no field to leak through.

use draftstore::TemplateRecord;
use serde::Serialize;
use time::OffsetDateTime;

/// One template in a listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: i64,
    pub display_name: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
}

impl From<TemplateRecord> for TemplateSummary {
    fn from(record: TemplateRecord) -> Self {
        Self {
            id: record.id,
            display_name: record.display_name,
            content_type: record.content_type,
            size_bytes: record.size_bytes,
            uploaded_at: record.uploaded_at,
        }
    }
}

/// Response for a successful upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: i64,
    pub display_name: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
}

impl From<TemplateRecord> for UploadResponse {
    fn from(record: TemplateRecord) -> Self {
        Self {
            id: record.id,
            display_name: record.display_name,
            content_type: record.content_type,
            size_bytes: record.size_bytes,
        }
    }
}

/// Response for a successful delete
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}
