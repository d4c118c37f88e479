//! Error types for the wallet domain

use thiserror::Error;

/// Result type for wallet domain operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wallet domain errors
///
/// Expected business outcomes (refused withdrawals, rejected amounts) are
/// not errors; they come back as structured values. This enum covers actual
/// bookkeeping faults.
#[derive(Error, Debug)]
pub enum Error {
    /// Transaction cannot be applied to this wallet
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Amount rejected by the validator
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] crate::validate::AmountError),

    /// Stored fingerprint does not match the recomputed one
    #[error("Integrity mismatch: {0}")]
    IntegrityMismatch(String),
}
