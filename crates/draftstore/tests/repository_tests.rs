//! Repository semantics over in-memory backends
//!
//! Failure injection goes through the storage seams: a catalog double that
//! refuses inserts exercises the upload rollback path.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use draftstore::storage::{
    MemoryBlobStorage, MemoryCatalog, MetadataCatalog, StorageError,
};
use draftstore::{NewRecord, RepositoryError, TemplateRecord, TemplateRepository};

fn memory_repository() -> (TemplateRepository, Arc<MemoryBlobStorage>, Arc<MemoryCatalog>) {
    let blobs = Arc::new(MemoryBlobStorage::new());
    let catalog = Arc::new(MemoryCatalog::new());
    let repository = TemplateRepository::new(blobs.clone(), catalog.clone());
    (repository, blobs, catalog)
}

/// Catalog double whose insert always fails
struct FailingInsertCatalog {
    inner: MemoryCatalog,
}

#[async_trait]
impl MetadataCatalog for FailingInsertCatalog {
    async fn insert(&self, _record: &NewRecord) -> Result<i64, StorageError> {
        Err(StorageError::Backend("Injected insert failure".into()))
    }

    async fn list_all(&self) -> Result<Vec<TemplateRecord>, StorageError> {
        self.inner.list_all().await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<TemplateRecord>, StorageError> {
        self.inner.get_by_id(id).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, StorageError> {
        self.inner.delete_by_id(id).await
    }
}

#[tokio::test]
async fn upload_rejects_empty_payload_and_empty_name() {
    let (repository, blobs, catalog) = memory_repository();

    let err = repository
        .upload(Vec::new(), "contract.txt", None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidInput(_)));

    let err = repository
        .upload(b"content".to_vec(), "", None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidInput(_)));

    // Nothing was written on either path.
    assert!(blobs.is_empty());
    assert!(catalog.is_empty());
}

#[tokio::test]
async fn fetch_round_trip_returns_exact_bytes() {
    let (repository, _blobs, _catalog) = memory_repository();

    let payload = vec![0u8, 255, 7, 0, 13, 10, 26, 127];
    let record = repository
        .upload(payload.clone(), "binary.docx", None)
        .await
        .unwrap();

    let (fetched, bytes) = repository.fetch(record.id).await.unwrap();
    assert_eq!(bytes, payload);
    assert_eq!(fetched.size_bytes, payload.len() as i64);
    assert_eq!(fetched.display_name, "binary.docx");
}

#[tokio::test]
async fn upload_rollback_leaves_no_blob() {
    let blobs = Arc::new(MemoryBlobStorage::new());
    let catalog = Arc::new(FailingInsertCatalog {
        inner: MemoryCatalog::new(),
    });
    let repository = TemplateRepository::new(blobs.clone(), catalog);

    let err = repository
        .upload(b"doomed".to_vec(), "doomed.txt", None)
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::Storage(_)));
    // The compensating delete removed the blob written before the insert.
    assert!(blobs.is_empty());
}

#[tokio::test]
async fn delete_of_absent_id_returns_not_found_and_leaves_others_intact() {
    let (repository, blobs, _catalog) = memory_repository();

    let record = repository
        .upload(b"keep me".to_vec(), "keeper.txt", None)
        .await
        .unwrap();

    let err = repository.delete(record.id + 41).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));

    let listed = repository.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, record.id);
    assert_eq!(blobs.len(), 1);
}

#[tokio::test]
async fn referential_integrity_holds_across_mixed_operations() {
    let (repository, blobs, _catalog) = memory_repository();

    let mut ids = Vec::new();
    for i in 0..6 {
        let record = repository
            .upload(
                format!("template body {}", i).into_bytes(),
                &format!("template-{}.txt", i),
                Some("text/plain".to_string()),
            )
            .await
            .unwrap();
        ids.push(record.id);
    }

    repository.delete(ids[1]).await.unwrap();
    repository.delete(ids[4]).await.unwrap();
    repository
        .upload(b"late arrival".to_vec(), "late.txt", None)
        .await
        .unwrap();

    // Every record's blob exists, and no blob lacks a record.
    let records = repository.list().await.unwrap();
    let record_keys: HashSet<String> =
        records.iter().map(|r| r.storage_key.clone()).collect();
    let blob_keys: HashSet<String> = blobs.keys().into_iter().collect();

    assert_eq!(record_keys, blob_keys);
    assert_eq!(records.len(), 5);
}

#[tokio::test]
async fn concurrent_same_id_deletes_produce_one_winner() {
    let (repository, blobs, catalog) = memory_repository();

    let record = repository
        .upload(b"contested".to_vec(), "contested.txt", None)
        .await
        .unwrap();

    let (a, b) = tokio::join!(repository.delete(record.id), repository.delete(record.id));

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one delete must win: {:?} / {:?}", a, b);

    let loser = if a.is_err() { a } else { b };
    assert!(matches!(loser, Err(RepositoryError::NotFound(_))));

    assert!(blobs.is_empty());
    assert!(catalog.is_empty());
}

#[tokio::test]
async fn fetch_with_missing_blob_reports_not_found() {
    let (repository, blobs, _catalog) = memory_repository();

    let record = repository
        .upload(b"soon gone".to_vec(), "tampered.txt", None)
        .await
        .unwrap();

    // Simulate external tampering with the blob directory.
    use draftstore::storage::BlobStorage;
    blobs.delete(&record.storage_key).await.unwrap();

    let err = repository.fetch(record.id).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(id) if id == record.id));
}

#[tokio::test]
async fn scenario_contract_txt_lifecycle() {
    let (repository, _blobs, _catalog) = memory_repository();

    let payload = b"0123456789".to_vec();
    let record = repository
        .upload(payload.clone(), "contract.txt", Some("text/plain".to_string()))
        .await
        .unwrap();

    assert_eq!(record.id, 1);
    assert_eq!(record.display_name, "contract.txt");
    assert_eq!(record.size_bytes, 10);

    let listed = repository.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, 1);
    assert_eq!(listed[0].display_name, "contract.txt");
    assert_eq!(listed[0].content_type.as_deref(), Some("text/plain"));
    assert_eq!(listed[0].size_bytes, 10);

    let (_, bytes) = repository.fetch(1).await.unwrap();
    assert_eq!(bytes, payload);

    repository.delete(1).await.unwrap();

    let err = repository.fetch(1).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(1)));
}
