//! Thumbnail generation
//!
//! `ThumbnailManager` is the contract used by `StorableFile`. The supplied
//! `ImageThumbnailManager` decodes raster images with the `image` crate and
//! stores one JPEG per `ThumbnailType` as `{type}/{storage_base_name}.jpg`,
//! so a file and its thumbnails share the storage identifier.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use curio_core::config::ThumbnailSizes;
use curio_core::constants::TEMP_FILE_PREFIX;
use curio_storage::FileStore;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};

use crate::error::MediaError;

/// Thumbnail variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThumbnailType {
    /// Fits inside a large bounding square
    Large,
    /// Fits inside a medium bounding square
    Medium,
    /// Center-cropped square
    Square,
}

impl ThumbnailType {
    pub const ALL: [ThumbnailType; 3] = [
        ThumbnailType::Large,
        ThumbnailType::Medium,
        ThumbnailType::Square,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThumbnailType::Large => "large",
            ThumbnailType::Medium => "medium",
            ThumbnailType::Square => "square",
        }
    }

    /// Storage path of this variant for a storage base name
    pub fn storage_path(&self, storage_base_name: &str) -> String {
        format!("{}/{}.jpg", self.as_str(), storage_base_name)
    }

    fn constraint(&self, sizes: &ThumbnailSizes) -> u32 {
        match self {
            ThumbnailType::Large => sizes.large,
            ThumbnailType::Medium => sizes.medium,
            ThumbnailType::Square => sizes.square,
        }
    }
}

/// Creates thumbnails of a local file
///
/// Best effort: `false` means no thumbnails were produced, which callers
/// are free to treat as non-fatal.
#[async_trait]
pub trait ThumbnailManager: Send + Sync {
    async fn create(&self, source: &Path, storage_base_name: &str) -> bool;
}

/// Raster thumbnail generator backed by the `image` crate
pub struct ImageThumbnailManager {
    store: Arc<dyn FileStore>,
    sizes: ThumbnailSizes,
    temp_dir: PathBuf,
}

impl ImageThumbnailManager {
    pub fn new(store: Arc<dyn FileStore>, sizes: ThumbnailSizes, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            sizes,
            temp_dir: temp_dir.into(),
        }
    }

    /// Decode the source and encode every variant as JPEG. Blocking.
    fn render(
        source: &Path,
        sizes: ThumbnailSizes,
    ) -> Result<Vec<(ThumbnailType, Vec<u8>)>, image::ImageError> {
        let img = ImageReader::open(source)?.with_guessed_format()?.decode()?;

        ThumbnailType::ALL
            .iter()
            .map(|&kind| -> Result<(ThumbnailType, Vec<u8>), image::ImageError> {
                let size = kind.constraint(&sizes);
                let thumb = match kind {
                    ThumbnailType::Square => img.resize_to_fill(size, size, FilterType::Lanczos3),
                    _ => fit_within(&img, size),
                };

                let mut buffer = Vec::new();
                DynamicImage::ImageRgb8(thumb.to_rgb8())
                    .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)?;
                Ok((kind, buffer))
            })
            .collect()
    }

    async fn store_variant(
        &self,
        kind: ThumbnailType,
        data: &[u8],
        storage_base_name: &str,
    ) -> Result<(), MediaError> {
        let temp = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .tempfile_in(&self.temp_dir)?;
        tokio::fs::write(temp.path(), data).await?;

        self.store
            .put(temp.path(), &kind.storage_path(storage_base_name))
            .await?;
        Ok(())
    }
}

/// Downscale to fit a bounding square, never upscale
fn fit_within(img: &DynamicImage, size: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= size && height <= size {
        img.clone()
    } else {
        img.thumbnail(size, size)
    }
}

#[async_trait]
impl ThumbnailManager for ImageThumbnailManager {
    async fn create(&self, source: &Path, storage_base_name: &str) -> bool {
        let source_path = source.to_path_buf();
        let sizes = self.sizes;
        let rendered =
            tokio::task::spawn_blocking(move || Self::render(&source_path, sizes)).await;

        let variants = match rendered {
            Ok(Ok(variants)) => variants,
            Ok(Err(e)) => {
                tracing::debug!(
                    error = %e,
                    source = %source.display(),
                    "Source is not a supported image, skipping thumbnails"
                );
                return false;
            }
            Err(e) => {
                tracing::error!(error = %e, "Thumbnail worker failed");
                return false;
            }
        };

        for (kind, data) in &variants {
            if let Err(e) = self.store_variant(*kind, data, storage_base_name).await {
                tracing::warn!(
                    error = %e,
                    thumbnail = kind.as_str(),
                    storage_base_name = %storage_base_name,
                    "Failed to store thumbnail"
                );
                return false;
            }
        }

        tracing::info!(
            storage_base_name = %storage_base_name,
            count = variants.len(),
            "Thumbnails created"
        );
        true
    }
}
