//! Metadata catalog abstraction
//!
//! The catalog owns id allocation: ids are assigned on insert, monotonically,
//! and never reused. `delete_by_id` atomically removes-and-reports, which is
//! what the repository relies on to serialize racing operations on one id.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

use super::StorageError;
use crate::record::{NewRecord, TemplateRecord};

/// Abstraction for metadata catalog backends
#[async_trait]
pub trait MetadataCatalog: Send + Sync {
    /// Insert a new record, assigning and returning a fresh unique id
    async fn insert(&self, record: &NewRecord) -> Result<i64, StorageError>;

    /// All records in insertion (ascending id) order
    async fn list_all(&self) -> Result<Vec<TemplateRecord>, StorageError>;

    /// Look up one record by id
    async fn get_by_id(&self, id: i64) -> Result<Option<TemplateRecord>, StorageError>;

    /// Remove the row if present. Returns whether a row was removed; the
    /// check-and-remove is atomic, so of two racing deletes exactly one
    /// observes `true`.
    async fn delete_by_id(&self, id: i64) -> Result<bool, StorageError>;
}

/// In-memory catalog implementation for testing
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    inner: Mutex<MemoryCatalogInner>,
}

#[derive(Debug, Default)]
struct MemoryCatalogInner {
    next_id: i64,
    records: BTreeMap<i64, TemplateRecord>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of stored records
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().records.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().records.is_empty()
    }
}

#[async_trait]
impl MetadataCatalog for MemoryCatalog {
    async fn insert(&self, record: &NewRecord) -> Result<i64, StorageError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| StorageError::Backend("Lock poisoned".into()))?;

        inner.next_id += 1;
        let id = inner.next_id;
        inner.records.insert(id, record.clone().into_record(id));
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<TemplateRecord>, StorageError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| StorageError::Backend("Lock poisoned".into()))?;

        // BTreeMap iterates in key order, which is insertion order here.
        Ok(inner.records.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<TemplateRecord>, StorageError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| StorageError::Backend("Lock poisoned".into()))?;

        Ok(inner.records.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, StorageError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| StorageError::Backend("Lock poisoned".into()))?;

        Ok(inner.records.remove(&id).is_some())
    }
}
