use thiserror::Error;

/// Errors that can occur during object store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The object id is malformed or escapes the store's namespace.
    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    /// The object exceeds the configured size limit.
    #[error("object exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },

    /// The remote service rejected the request or could not be reached.
    #[error("remote object store error: {0}")]
    Remote(String),

    /// Failure produced on purpose by a test double.
    #[error("injected failure: {0}")]
    Injected(String),
}
