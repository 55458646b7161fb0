//! Curio Media Library
//!
//! Ingestion helpers for uploaded files: content-based media type detection,
//! canonical extension resolution, the `StorableFile` wrapper around a
//! transient local copy, and thumbnail generation.

pub mod detection;
pub mod error;
pub mod extension;
pub mod storable_file;
pub mod thumbnail;

pub use detection::detect_media_type;
pub use error::MediaError;
pub use extension::{original_extension, resolve_extension};
pub use storable_file::{FileServices, StorableFile};
pub use thumbnail::{ImageThumbnailManager, ThumbnailManager, ThumbnailType};
