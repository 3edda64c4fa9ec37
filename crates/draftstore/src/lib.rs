//! # Draftstore
//!
//! Template repository for a word-processor add-in backend. Binary template
//! content lives in a blob store, one metadata record per template lives in a
//! catalog, and [`TemplateRepository`] composes the two into atomic
//! upload/list/fetch/delete operations:
//!
//! - every catalog record has exactly one retrievable blob (or neither exists)
//! - ids are assigned by the catalog and never reused
//! - a failed upload leaves no orphaned blob behind
//! - a failed delete leaves the record fetchable, with a retry path
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use draftstore::TemplateRepository;
//! use draftstore::storage::{MemoryBlobStorage, MemoryCatalog};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = TemplateRepository::new(
//!     Arc::new(MemoryBlobStorage::new()),
//!     Arc::new(MemoryCatalog::new()),
//! );
//!
//! let record = repository
//!     .upload(
//!         b"Dear {{client}}, ...".to_vec(),
//!         "engagement-letter.txt",
//!         Some("text/plain".to_string()),
//!     )
//!     .await?;
//!
//! let (record, bytes) = repository.fetch(record.id).await?;
//! println!("{} is {} bytes", record.display_name, bytes.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod record;
pub mod repository;
pub mod storage;

pub use error::{RepositoryError, Result};
pub use record::{NewRecord, TemplateRecord};
pub use repository::TemplateRepository;
