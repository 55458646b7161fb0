//! Stored file helper
//!
//! A `StorableFile` wraps one transient local file (the upload being
//! ingested) and derives everything needed to persist it: the detected media
//! type, the resolved extension, and a random storage identifier shared by
//! the original and its thumbnails.
//!
//! Derived values are computed on first request and cached until the
//! transient file is refilled. The transient file is created lazily and
//! released by `delete()`, after which the record can no longer read or
//! store it; anything still present when the record is dropped is removed
//! as well.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use curio_core::constants::{ORIGINAL_STORAGE_PREFIX, STORAGE_ID_BYTES, TEMP_FILE_PREFIX};
use curio_core::MediaTypeExtensionMap;
use curio_storage::FileStore;
use tempfile::TempPath;

use crate::detection::detect_media_type;
use crate::error::MediaError;
use crate::extension::resolve_extension;
use crate::thumbnail::ThumbnailManager;

/// Collaborators a `StorableFile` delegates to
#[derive(Clone)]
pub struct FileServices {
    pub store: Arc<dyn FileStore>,
    pub thumbnails: Arc<dyn ThumbnailManager>,
    pub media_types: Arc<MediaTypeExtensionMap>,
}

pub struct StorableFile {
    services: FileServices,
    temp_dir: PathBuf,
    temp_path: Option<TempPath>,
    discarded: bool,
    storage_base_name: Option<String>,
    storage_name: Option<String>,
    media_type: Option<String>,
    extension: Option<Option<String>>,
}

impl StorableFile {
    pub fn new(services: FileServices, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            services,
            temp_dir: temp_dir.into(),
            temp_path: None,
            discarded: false,
            storage_base_name: None,
            storage_name: None,
            media_type: None,
            extension: None,
        }
    }

    /// Path to the transient local file, creating an empty one on first use
    ///
    /// Fails with `MediaError::Discarded` once `delete()` has been called.
    pub fn temp_path(&mut self) -> Result<&Path, MediaError> {
        if self.discarded {
            return Err(MediaError::Discarded);
        }
        let temp = match self.temp_path.take() {
            Some(temp) => temp,
            None => create_temp_file(&self.temp_dir)?,
        };
        let path: &Path = self.temp_path.insert(temp);
        Ok(path)
    }

    /// Replace the transient file with a fresh, empty one in `temp_dir`
    /// (or the configured temp directory).
    pub fn set_temp_path(&mut self, temp_dir: Option<&Path>) -> Result<&Path, MediaError> {
        if self.discarded {
            return Err(MediaError::Discarded);
        }
        let dir = temp_dir.unwrap_or(&self.temp_dir);
        let temp = create_temp_file(dir)?;
        if let Some(previous) = self.temp_path.replace(temp) {
            discard(previous)?;
        }
        self.clear_derived();
        self.temp_path()
    }

    /// Overwrite the transient file with `data`
    pub async fn write_bytes(&mut self, data: &[u8]) -> Result<(), MediaError> {
        let path = self.temp_path()?.to_path_buf();
        tokio::fs::write(&path, data).await?;
        self.clear_derived();
        Ok(())
    }

    /// Overwrite the transient file with the contents of `source`
    pub async fn copy_from(&mut self, source: &Path) -> Result<u64, MediaError> {
        let path = self.temp_path()?.to_path_buf();
        let size = tokio::fs::copy(source, &path).await?;
        self.clear_derived();
        tracing::debug!(
            source = %source.display(),
            temp_path = %path.display(),
            size_bytes = size,
            "Copied source into temporary file"
        );
        Ok(size)
    }

    /// Media type detected from the transient file's content
    pub async fn media_type(&mut self) -> Result<String, MediaError> {
        if let Some(media_type) = &self.media_type {
            return Ok(media_type.clone());
        }
        let path = self.temp_path()?.to_path_buf();
        let media_type = detect_media_type(&path).await?;
        self.media_type = Some(media_type.clone());
        Ok(media_type)
    }

    /// Extension the stored file should carry, given its original name
    ///
    /// Computed once; later calls return the cached value whatever name
    /// they pass.
    pub async fn extension(&mut self, original_name: &str) -> Result<Option<String>, MediaError> {
        if let Some(extension) = &self.extension {
            return Ok(extension.clone());
        }
        let media_type = self.media_type().await?;
        let extension = resolve_extension(&media_type, original_name, &self.services.media_types);
        self.extension = Some(extension.clone());
        Ok(extension)
    }

    /// Random storage identifier shared by the original and its thumbnails
    pub fn storage_base_name(&mut self) -> String {
        self.storage_base_name
            .get_or_insert_with(generate_storage_id)
            .clone()
    }

    /// Storage identifier with the extension appended, if any
    pub fn storage_name(&mut self, extension: Option<&str>) -> String {
        if let Some(name) = &self.storage_name {
            return name.clone();
        }
        let base = self.storage_base_name();
        let name = match extension {
            Some(ext) if !ext.is_empty() => format!("{}.{}", base, ext),
            _ => base,
        };
        self.storage_name = Some(name.clone());
        name
    }

    /// Persist the transient file as the original; returns its storage path
    pub async fn store_original(&mut self, original_name: &str) -> Result<String, MediaError> {
        let path = self.temp_path()?.to_path_buf();
        let extension = self.extension(original_name).await?;
        let storage_path = format!(
            "{}/{}",
            ORIGINAL_STORAGE_PREFIX,
            self.storage_name(extension.as_deref())
        );

        self.services.store.put(&path, &storage_path).await?;

        tracing::info!(
            storage_path = %storage_path,
            original_name = %original_name,
            "Stored original file"
        );
        Ok(storage_path)
    }

    /// Create and store thumbnails; returns whether any were produced
    pub async fn store_thumbnails(&mut self) -> Result<bool, MediaError> {
        let path = self.temp_path()?.to_path_buf();
        let base_name = self.storage_base_name();
        Ok(self.services.thumbnails.create(&path, &base_name).await)
    }

    /// Forget values derived from the previous content
    fn clear_derived(&mut self) {
        self.media_type = None;
        self.extension = None;
        self.storage_name = None;
    }

    /// Whether a transient file currently exists for this record
    pub fn has_temp_file(&self) -> bool {
        self.temp_path.is_some()
    }

    /// Delete the transient file and stop using it
    ///
    /// Succeeds without doing anything when no file was created or it was
    /// already deleted.
    pub fn delete(&mut self) -> Result<(), MediaError> {
        self.discarded = true;
        match self.temp_path.take() {
            Some(temp) => discard(temp),
            None => Ok(()),
        }
    }
}

fn create_temp_file(dir: &Path) -> Result<TempPath, MediaError> {
    let temp = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .tempfile_in(dir)?
        .into_temp_path();
    Ok(temp)
}

/// Remove a transient file; one that is already gone counts as removed
fn discard(temp: TempPath) -> Result<(), MediaError> {
    let path = temp.to_path_buf();
    match temp.close() {
        Ok(()) => {
            tracing::debug!(temp_path = %path.display(), "Deleted temporary file");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn generate_storage_id() -> String {
    hex::encode(rand::random::<[u8; STORAGE_ID_BYTES]>())
}
