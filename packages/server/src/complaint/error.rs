use common::storage::StorageError;
use sea_orm::DbErr;
use thiserror::Error;

/// Failure of a complaint operation, as seen by the caller.
#[derive(Debug, Error)]
pub enum ComplaintError {
    /// The command violates a required-field rule. Raised before any I/O.
    #[error("{0}")]
    Validation(String),

    /// An object store upload failed. Earlier uploads have been compensated.
    #[error("could not upload image '{file_name}': {source}")]
    Upload {
        file_name: String,
        source: StorageError,
    },

    /// A repository read or write failed.
    #[error("could not save complaint: {0}")]
    Persistence(#[from] DbErr),

    /// The complaint is referenced by dependent work and cannot be removed.
    #[error("{0}")]
    Conflict(String),

    /// The caller went away before the complaint was persisted.
    #[error("complaint creation was cancelled")]
    Cancelled,
}

/// A cleanup delete that did not go through. Logged, never returned to callers.
#[derive(Debug, Error)]
#[error("failed to delete object {object_id}: {source}")]
pub struct CompensationError {
    pub object_id: String,
    pub source: StorageError,
}
