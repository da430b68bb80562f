use thiserror::Error;

/// Errors from a completion request. None of them are retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("API error: {status} {reason}")]
    Http { status: u16, reason: String },

    /// The response body lacked the completion text.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The client could not be configured.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias for completion results.
pub type CompletionResult<T> = Result<T, CompletionError>;
