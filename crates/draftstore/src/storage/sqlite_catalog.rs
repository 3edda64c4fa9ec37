//! SQLite metadata catalog implementation
//!
//! Stores one row per template in a local SQLite database file. Timestamps
//! are kept as RFC 3339 text; ids come from the AUTOINCREMENT rowid, so a
//! deleted id is never handed out again.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteConnectOptions, sqlite::SqliteRow};
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::{MetadataCatalog, StorageError};
use crate::record::{NewRecord, TemplateRecord};

/// SQLite-based metadata catalog
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    /// Create a new catalog backed by the given SQLite connection string
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StorageError::Backend(format!("Invalid database path: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await.map_err(|e| {
            StorageError::Unavailable(format!("Failed to connect to SQLite: {}", e))
        })?;

        let catalog = Self { pool };
        catalog.init_schema().await?;
        Ok(catalog)
    }

    /// Create the catalog from the DATABASE_URL environment variable
    ///
    /// Example: sqlite:./data/draftstore.db
    pub async fn from_env() -> Result<Self, StorageError> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/draftstore.db".to_string());

        Self::new(&database_url).await
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS templates (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                display_name TEXT NOT NULL,
                content_type TEXT,
                size_bytes INTEGER NOT NULL,
                uploaded_at TEXT NOT NULL,
                storage_key TEXT NOT NULL UNIQUE
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create templates table", e))?;

        Ok(())
    }
}

/// Map a sqlx error: pool/IO-level failures mean the catalog is unreachable,
/// everything else is a backend error.
fn db_error(context: &str, e: sqlx::Error) -> StorageError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StorageError::Unavailable(format!("{}: {}", context, e))
        }
        e => StorageError::Backend(format!("{}: {}", context, e)),
    }
}

fn record_from_row(row: &SqliteRow) -> Result<TemplateRecord, StorageError> {
    let uploaded_at_str: String = row.get("uploaded_at");
    let uploaded_at = OffsetDateTime::parse(&uploaded_at_str, &Rfc3339)
        .map_err(|e| StorageError::Backend(format!("Failed to parse timestamp: {}", e)))?;

    Ok(TemplateRecord {
        id: row.get("id"),
        display_name: row.get("display_name"),
        content_type: row.get("content_type"),
        size_bytes: row.get("size_bytes"),
        uploaded_at,
        storage_key: row.get("storage_key"),
    })
}

#[async_trait]
impl MetadataCatalog for SqliteCatalog {
    async fn insert(&self, record: &NewRecord) -> Result<i64, StorageError> {
        let uploaded_at = record
            .uploaded_at
            .format(&Rfc3339)
            .map_err(|e| StorageError::Backend(format!("Failed to format timestamp: {}", e)))?;

        let result = sqlx::query(
            r#"
            INSERT INTO templates (display_name, content_type, size_bytes, uploaded_at, storage_key)
            VALUES (?, ?, ?, ?, ?)
        "#,
        )
        .bind(&record.display_name)
        .bind(&record.content_type)
        .bind(record.size_bytes)
        .bind(uploaded_at)
        .bind(&record.storage_key)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert record", e))?;

        Ok(result.last_insert_rowid())
    }

    async fn list_all(&self) -> Result<Vec<TemplateRecord>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT id, display_name, content_type, size_bytes, uploaded_at, storage_key
            FROM templates
            ORDER BY id ASC
        "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list records", e))?;

        rows.iter().map(record_from_row).collect()
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<TemplateRecord>, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT id, display_name, content_type, size_bytes, uploaded_at, storage_key
            FROM templates
            WHERE id = ?
        "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to get record", e))?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM templates WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete record", e))?;

        Ok(result.rows_affected() > 0)
    }
}
