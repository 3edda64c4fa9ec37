//! Error types for the template repository

use thiserror::Error;

/// Repository-level errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Template not found: {0}")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, RepositoryError>;
