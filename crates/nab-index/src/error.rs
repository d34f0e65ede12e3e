//! Error types for the index crate.

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] nab_store::StoreError),

    /// A bucket soul could not be built.
    #[error("schema error: {0}")]
    Schema(#[from] nab_schema::SchemaError),

    /// The thing's fields could not be interpreted.
    #[error("type error: {0}")]
    Type(#[from] nab_types::TypeError),

    /// A deferred index task panicked or was cancelled.
    #[error("deferred index task failed: {0}")]
    Deferred(String),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
