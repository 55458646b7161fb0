//! Constants shared across crates.

/// Generic binary media type. Never triggers extension substitution.
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Media type reported for zero-length files.
pub const EMPTY_MEDIA_TYPE: &str = "application/x-empty";

/// Storage prefix for original files.
pub const ORIGINAL_STORAGE_PREFIX: &str = "original";

/// Number of random bytes behind a storage identifier (hex-encoded to twice as many chars).
pub const STORAGE_ID_BYTES: usize = 20;

/// Prefix for transient local files.
pub const TEMP_FILE_PREFIX: &str = "curio";

/// Table whose presence marks an existing installation.
pub const INSTALL_CHECK_TABLE: &str = "user";
