//! Error types for the ledger service

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger service errors
#[derive(Error, Debug)]
pub enum Error {
    /// Storage error (RocksDB)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Transaction rejected before commit
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Amount rejected by the validator
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] wallet_core::AmountError),

    /// No wallet recorded for this rider
    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    /// Transaction not found
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// No open hold with this ID
    #[error("Withdrawal hold not found: {0}")]
    HoldNotFound(String),

    /// Stored fingerprint does not match the recomputed one
    #[error("Integrity mismatch: {0}")]
    IntegrityMismatch(String),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

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

impl From<wallet_core::Error> for Error {
    fn from(err: wallet_core::Error) -> Self {
        match err {
            wallet_core::Error::InvalidTransaction(msg) => Error::InvalidTransaction(msg),
            wallet_core::Error::InvalidAmount(e) => Error::InvalidAmount(e),
            wallet_core::Error::IntegrityMismatch(msg) => Error::IntegrityMismatch(msg),
        }
    }
}
