//! Error types for the diff crate.

/// Errors that can occur when selecting states to compare.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// The entry has fewer than two states.
    #[error("not enough versions to compare (have {available})")]
    NotEnoughVersions { available: usize },

    /// A requested state index does not exist.
    #[error("version index {index} out of range (have {available})")]
    IndexOutOfRange { index: usize, available: usize },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
