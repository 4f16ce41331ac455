//! Error types for the settlement engine

use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug)]
pub enum Error {
    /// Couple configuration not found; nothing was mutated
    #[error("Couple configuration not found: {0}")]
    CoupleNotFound(String),

    /// Underlying store failure (retryable infrastructure error)
    #[error("Ledger error: {0}")]
    Ledger(#[from] expense_ledger::Error),

    /// Settlement/link conflict, distinct from a clean storage error.
    /// The close must not be retried blindly.
    #[error("Settlement inconsistency: {0}")]
    Inconsistency(String),

    /// Unparseable or out-of-order dates
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Malformed chat command
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Outbound message gateway failure
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
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
