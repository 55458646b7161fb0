//! Curio Storage Library
//!
//! This crate provides the `FileStore` abstraction that persists local files
//! under backend-defined storage paths, with implementations for the local
//! filesystem and S3.
//!
//! # Storage path format
//!
//! Storage paths are relative, `/`-separated keys such as
//! `original/{storage_name}` or `square/{base_name}.jpg`. They must not
//! contain `..` or a leading `/`; validation lives in the `keys` module so
//! all backends agree.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use curio_core::StorageBackend;
pub use factory::create_file_store;
#[cfg(feature = "storage-local")]
pub use local::LocalFileStore;
#[cfg(feature = "storage-s3")]
pub use s3::S3FileStore;
pub use traits::{FileStore, StorageError, StorageResult};
