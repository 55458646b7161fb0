#[cfg(feature = "storage-local")]
use crate::LocalFileStore;
#[cfg(feature = "storage-s3")]
use crate::S3FileStore;
use crate::{FileStore, StorageBackend, StorageError, StorageResult};
use curio_core::Config;
use std::sync::Arc;

/// Public URL prefix for local files when none is configured
#[cfg(feature = "storage-local")]
const DEFAULT_LOCAL_BASE_URL: &str = "/files";

/// Create a storage backend based on configuration
pub async fn create_file_store(config: &Config) -> StorageResult<Arc<dyn FileStore>> {
    match config.storage_backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config
                .s3_region()
                .map(String::from)
                .or_else(|| config.aws_region().map(String::from))
                .ok_or_else(|| {
                    StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
                })?;
            let endpoint = config.s3_endpoint().map(String::from);

            let store = S3FileStore::new(bucket, region, endpoint)?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config
                .local_storage_base_url()
                .unwrap_or(DEFAULT_LOCAL_BASE_URL)
                .to_string();

            let store = LocalFileStore::new(base_path, base_url).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
