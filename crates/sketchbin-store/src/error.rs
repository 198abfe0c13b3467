/// Errors from document store operations.
///
/// A missing document is never an error: lookups return `Option` and
/// mutators return `bool`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Sidecar metadata could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The configured backend name is not recognised.
    #[error("unknown storage backend: {0} (expected \"memory\" or \"filesystem\")")]
    UnknownBackend(String),

    /// A lock guarding store state was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
