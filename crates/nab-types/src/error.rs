use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unknown thing kind: {0}")]
    UnknownThingKind(String),

    #[error("unknown vote kind: {0}")]
    UnknownVoteKind(String),

    #[error("timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    #[error("serialization error: {0}")]
    Serialization(String),
}
