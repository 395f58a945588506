//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Copy failed: {0}")]
    CopyFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    pub fn not_found(bucket: &str, key: &str) -> Self {
        StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object storage abstraction
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// The router only depends on these capabilities, never on a concrete client,
/// so tests can substitute an in-memory implementation.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Get the size in bytes of an object.
    ///
    /// Returns `StorageError::NotFound` when the object does not exist.
    async fn content_length(&self, bucket: &str, key: &str) -> StorageResult<u64>;

    /// Download the full contents of an object
    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>>;

    /// Copy an object into another bucket under the same key, overwriting any
    /// object already stored there.
    async fn copy(&self, from_bucket: &str, to_bucket: &str, key: &str) -> StorageResult<()>;

    /// Delete an object
    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
