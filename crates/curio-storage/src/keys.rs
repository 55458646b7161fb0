//! Shared storage path validation for storage backends.

use crate::traits::{StorageError, StorageResult};

/// Reject storage paths that could escape the backend's root.
pub fn validate_storage_path(storage_path: &str) -> StorageResult<()> {
    if storage_path.is_empty() {
        return Err(StorageError::InvalidKey("Storage path is empty".to_string()));
    }
    if storage_path.contains("..") || storage_path.starts_with('/') || storage_path.contains('\\')
    {
        return Err(StorageError::InvalidKey(format!(
            "Storage path contains invalid characters: {}",
            storage_path
        )));
    }
    Ok(())
}
