//! Configuration module
//!
//! Environment-driven configuration for the installer and the file
//! ingestion pipeline: database, table prefix, temp directory, storage
//! backend and thumbnail sizes.

use std::env;
use std::path::PathBuf;

use crate::media_types::MediaTypeExtensionMap;
use crate::storage_types::StorageBackend;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const THUMBNAIL_LARGE_SIZE: u32 = 800;
const THUMBNAIL_MEDIUM_SIZE: u32 = 200;
const THUMBNAIL_SQUARE_SIZE: u32 = 200;

/// Pixel constraints for generated thumbnails
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThumbnailSizes {
    pub large: u32,
    pub medium: u32,
    pub square: u32,
}

impl Default for ThumbnailSizes {
    fn default() -> Self {
        Self {
            large: THUMBNAIL_LARGE_SIZE,
            medium: THUMBNAIL_MEDIUM_SIZE,
            square: THUMBNAIL_SQUARE_SIZE,
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Prepended to every table name (e.g. "curio_" → "curio_user")
    pub table_prefix: String,
    pub temp_dir: PathBuf,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    // Media configuration
    pub media_type_map_path: Option<PathBuf>,
    pub thumbnail_sizes: ThumbnailSizes,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            table_prefix: String::new(),
            temp_dir: env::temp_dir(),
            storage_backend: StorageBackend::Local,
            local_storage_path: None,
            local_storage_base_url: None,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            media_type_map_path: None,
            thumbnail_sizes: ThumbnailSizes::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(s) => s.parse()?,
            Err(_) => StorageBackend::Local,
        };

        let sizes = ThumbnailSizes::default();
        let thumbnail_sizes = ThumbnailSizes {
            large: env::var("THUMBNAIL_LARGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(sizes.large),
            medium: env::var("THUMBNAIL_MEDIUM_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(sizes.medium),
            square: env::var("THUMBNAIL_SQUARE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(sizes.square),
        };

        Ok(Config {
            database_url: env::var("DATABASE_URL").unwrap_or_default(),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            table_prefix: env::var("TABLE_PREFIX").unwrap_or_default(),
            temp_dir: env::var("TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            storage_backend,
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            media_type_map_path: env::var("MEDIA_TYPE_MAP_PATH").ok().map(PathBuf::from),
            thumbnail_sizes,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.is_empty()
            && !(self.database_url.starts_with("postgres://")
                || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if !self
            .table_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(anyhow::anyhow!(
                "TABLE_PREFIX may only contain ASCII letters, digits and underscores"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Name of a table with the configured prefix applied
    pub fn table_name(&self, base: &str) -> String {
        format!("{}{}", self.table_prefix, base)
    }

    /// Load the configured media type map, or the built-in one
    pub fn media_type_map(&self) -> Result<MediaTypeExtensionMap, anyhow::Error> {
        match &self.media_type_map_path {
            Some(path) => MediaTypeExtensionMap::from_json_file(path),
            None => Ok(MediaTypeExtensionMap::default()),
        }
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.local_storage_base_url.as_deref()
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.aws_region.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> Config {
        Config {
            database_url: "postgres://curio@localhost/curio".to_string(),
            local_storage_path: Some("/var/lib/curio/files".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn validate_accepts_local_config() {
        assert!(local_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_postgres_url() {
        let config = Config {
            database_url: "mysql://localhost/curio".to_string(),
            ..local_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unsafe_table_prefix() {
        let config = Config {
            table_prefix: "curio; DROP".to_string(),
            ..local_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_requires_s3_bucket_and_region() {
        let mut config = Config {
            storage_backend: StorageBackend::S3,
            ..local_config()
        };
        assert!(config.validate().is_err());

        config.s3_bucket = Some("curio-files".to_string());
        assert!(config.validate().is_err());

        config.aws_region = Some("eu-west-1".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn table_name_applies_prefix() {
        let config = Config {
            table_prefix: "curio_".to_string(),
            ..Config::default()
        };
        assert_eq!(config.table_name("user"), "curio_user");
    }
}
