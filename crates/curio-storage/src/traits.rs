//! Storage abstraction trait
//!
//! This module defines the `FileStore` trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

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

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Persists local files under backend-defined storage paths. Callers hand
/// over a path on the local filesystem; the backend decides how and where the
/// bytes end up. Failures are signalled through `StorageError` and are never
/// retried here.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persist the file at `local_path` under `storage_path`, replacing any
    /// existing object.
    async fn put(&self, local_path: &Path, storage_path: &str) -> StorageResult<()>;

    /// Delete a stored object. Deleting a missing object is not an error.
    async fn delete(&self, storage_path: &str) -> StorageResult<()>;

    /// Check if a stored object exists
    async fn exists(&self, storage_path: &str) -> StorageResult<bool>;

    /// Public URI of a stored object
    fn uri(&self, storage_path: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
