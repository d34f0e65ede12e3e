use nab_types::Soul;

/// Errors from graph store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The subscription feeding a one-shot read was closed before a value arrived.
    #[error("subscription closed for {0}")]
    SubscriptionClosed(Soul),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
