use thiserror::Error;

/// Errors produced by type construction and record validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("score out of range: {0} (expected 0..=100)")]
    ScoreOutOfRange(i64),

    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid record: {0}")]
    InvalidRecord(String),
}
