//! Error types for import and export.

use thiserror::Error;

/// Errors raised while exporting or importing history documents.
///
/// `Format` and `EmptyImport` are user-facing validation failures; the
/// message is suitable for display as-is.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The document is not valid JSON or its root is not an array.
    #[error("imported data must be an array of entries: {0}")]
    Format(String),

    /// No item in the document carried the required fields.
    #[error("no valid entries found in imported data")]
    EmptyImport,

    /// The entry list could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Persisting the merged history failed.
    #[error("store error: {0}")]
    Store(#[from] popt_store::StoreError),
}

/// Convenience alias for transfer results.
pub type TransferResult<T> = Result<T, TransferError>;
