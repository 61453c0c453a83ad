use folio_types::ContentHash;

/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested blob was not found.
    #[error("blob not found: {0}")]
    NotFound(ContentHash),

    /// Stored bytes no longer match their content address (data corruption).
    #[error("hash mismatch for {expected}: stored bytes hash to {computed}")]
    HashMismatch {
        expected: ContentHash,
        computed: ContentHash,
    },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding in-memory state was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
