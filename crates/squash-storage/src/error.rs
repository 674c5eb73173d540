//! Storage operation errors.

use thiserror::Error;

use squash_core::SquashError;

/// Errors from the RocksDB checkpoint store.
///
/// Converted into [`SquashError::Checkpoint`] at the trait boundary so
/// callers see the shared taxonomy.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database failed to open.
    #[error("failed to open checkpoint database at '{path}': {message}")]
    OpenFailed { path: String, message: String },

    /// Column family missing. Should not happen when the database was
    /// opened through this crate.
    #[error("column family '{name}' not found")]
    ColumnFamilyNotFound { name: String },

    /// Read operation failed.
    #[error("checkpoint read failed: {0}")]
    ReadFailed(String),

    /// Write operation failed.
    #[error("checkpoint write failed: {0}")]
    WriteFailed(String),
}

impl From<StorageError> for SquashError {
    fn from(err: StorageError) -> Self {
        SquashError::Checkpoint(err.to_string())
    }
}
