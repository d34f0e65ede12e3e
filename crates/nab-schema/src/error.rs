//! Error types for schema operations.

use thiserror::Error;

/// Errors that can occur while building or filling soul templates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The template pattern is malformed.
    #[error("invalid soul template {template}: {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// A key field required by the template was not supplied.
    #[error("missing key {key} for soul template {template}")]
    MissingKey { template: String, key: String },

    /// A key field was supplied but empty.
    #[error("empty key {key} for soul template {template}")]
    EmptyKey { template: String, key: String },

    /// The namespace is not a valid soul prefix.
    #[error("invalid namespace {name}: {reason}")]
    InvalidNamespace { name: String, reason: String },
}

/// Convenience type alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
