use thiserror::Error;

/// Core error type shared across Storeforge crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A monetary amount could not be parsed.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// The catalog violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// A table name does not belong to the catalog.
    #[error("unknown table: {0}")]
    UnknownTable(String),
}

/// Convenience alias for results returned by Storeforge crates.
pub type Result<T> = std::result::Result<T, Error>;
