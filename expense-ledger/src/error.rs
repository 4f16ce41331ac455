//! Error types for the expense ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Storage error (RocksDB)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Couple configuration not found
    #[error("Couple not found: {0}")]
    CoupleNotFound(String),

    /// Expense not found
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),

    /// Settlement not found
    #[error("Settlement not found: {0}")]
    SettlementNotFound(String),

    /// Expense already linked to a settlement; the atomic claim lost
    #[error("Expense already settled: {0}")]
    AlreadySettled(String),

    /// Split configuration out of bounds
    #[error("Invalid split configuration: {0}")]
    InvalidSplit(String),

    /// Expense amount out of bounds
    #[error("Invalid expense amount: {0}")]
    InvalidAmount(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<rocksdb::Error> for Error {
    fn from(err: rocksdb::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
