use thiserror::Error;

#[derive(Debug, Error)]
pub enum PeerError {
    #[error("not logged in: {0}")]
    Unauthenticated(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("hash error: {0}")]
    Hash(#[from] nab_crypto::HasherError),

    #[error("store error: {0}")]
    Store(#[from] nab_store::StoreError),

    #[error("schema error: {0}")]
    Schema(#[from] nab_schema::SchemaError),

    #[error("index error: {0}")]
    Index(#[from] nab_index::IndexError),

    #[error("type error: {0}")]
    Type(#[from] nab_types::TypeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PeerResult<T> = Result<T, PeerError>;
