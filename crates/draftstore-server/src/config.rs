//! Server configuration management

use crate::error::{ApiError, Result};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Directory holding template blobs
    pub blob_dir: String,

    /// SQLite connection string for the metadata catalog
    pub database_url: String,

    /// Upload size cap in bytes
    pub max_upload_bytes: usize,

    /// Chat-completions endpoint drafting requests are forwarded to
    pub completions_url: String,

    /// Bearer token for the completions endpoint
    pub completions_api_key: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid PORT value".to_string()))?,
            blob_dir: std::env::var("TEMPLATES_DIR")
                .unwrap_or_else(|_| "./data/templates".to_string()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./data/draftstore.db".to_string()),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (25 * 1024 * 1024).to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid MAX_UPLOAD_BYTES value".to_string()))?,
            completions_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string()),
            completions_api_key: std::env::var("OPENAI_API_KEY").ok(),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            blob_dir: "./data/templates".to_string(),
            database_url: "sqlite:./data/draftstore.db".to_string(),
            max_upload_bytes: 25 * 1024 * 1024,
            completions_url: "https://api.openai.com/v1/chat/completions".to_string(),
            completions_api_key: None,
        }
    }
}
