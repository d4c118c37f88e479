//! Rider wallet domain core
//!
//! Pure domain logic for the delivery-rider wallet: transaction records,
//! amount validation, integrity fingerprints, balance and statistics
//! derivation, and the withdrawal policy.
//!
//! # Design
//!
//! - **Exact arithmetic**: money is `Decimal`, never floating point; `f64`
//!   only crosses the boundary inside [`validate::validate_amount`]
//! - **Soft failures**: validation results, withdrawal decisions, and
//!   integrity checks are returned values, never panics
//! - **No I/O**: everything here is synchronous and side-effect free, so it
//!   can be called concurrently without coordination

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod balance;
pub mod error;
pub mod format;
pub mod integrity;
pub mod policy;
pub mod stats;
pub mod types;
pub mod validate;

// Re-exports
pub use balance::available_balance;
pub use error::{Error, Result};
pub use format::format_usd;
pub use policy::{WithdrawalDecision, WithdrawalPolicy};
pub use stats::WalletStats;
pub use types::{RiderId, Transaction, TransactionKind, WalletSnapshot, WithdrawalHold};
pub use validate::{validate_amount, AmountError, AmountLimits};
