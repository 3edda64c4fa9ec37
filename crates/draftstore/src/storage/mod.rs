//! Storage abstractions backing the template repository
//!
//! Two seams: [`BlobStorage`] for raw template bytes keyed by an opaque
//! storage key, and [`MetadataCatalog`] for the records describing them.
//! The repository is the only component that writes through either.

use thiserror::Error;

pub mod blob_storage;
pub mod catalog;
pub mod fs_storage;
pub mod sqlite_catalog;

pub use blob_storage::{BlobStorage, MemoryBlobStorage};
pub use catalog::{MemoryCatalog, MetadataCatalog};
pub use fs_storage::FsBlobStorage;
pub use sqlite_catalog::SqliteCatalog;

/// Errors surfaced by the storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Key not found: {0}")]
    NotFound(String),

    #[error("Invalid key format: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}
