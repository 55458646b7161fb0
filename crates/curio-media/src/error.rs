use curio_storage::StorageError;

/// Errors raised while handling a stored file
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("The temporary file was already deleted")]
    Discarded,
}
