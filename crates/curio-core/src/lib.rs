//! Curio Core Library
//!
//! This crate provides configuration, error types, and the media-type to
//! extension map shared across all Curio components.

pub mod config;
pub mod constants;
pub mod error;
pub mod media_types;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, LogLevel};
pub use media_types::MediaTypeExtensionMap;
pub use storage_types::StorageBackend;
