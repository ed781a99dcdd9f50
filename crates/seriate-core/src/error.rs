use thiserror::Error;

use crate::schema::DataType;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A value of one type was written into storage declared as another.
    /// Fatal to the query; there is no retry path.
    #[error("Schema mismatch: expected {expected:?}, found {found:?}")]
    SchemaMismatch { expected: DataType, found: DataType },

    #[error("Internal invariant failed: {0}")]
    Invariant(String),
}

impl Error {
    pub fn invariant(msg: impl Into<String>) -> Self {
        Error::Invariant(msg.into())
    }
}
