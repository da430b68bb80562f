/// Errors from key-value store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A persisted document could not be decoded.
    #[error("corrupt document {key}: {reason}")]
    Corrupt { key: String, reason: String },

    /// A document could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Writing would exceed the backend's byte quota.
    #[error("quota exceeded writing {key}: {needed} bytes needed, limit {limit}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    /// The key cannot be used by this backend.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    /// I/O error from the underlying storage medium.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store cannot be used (poisoned lock, read-only medium).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns `true` for errors raised while decoding persisted data.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
