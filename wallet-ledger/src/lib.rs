//! Rider wallet ledger service
//!
//! Persistent, race-free write path for the rider wallet:
//!
//! - **Single writer**: one actor task owns all wallet mutation, so
//!   "read balance, decide, commit hold" is a serialized unit and two
//!   concurrent withdrawal requests can never both pass against the same
//!   snapshot
//! - **Atomic commits**: transaction, snapshot, and index land in one
//!   RocksDB write batch
//! - **Derived state**: every snapshot can be rebuilt from the transaction
//!   history and checked for conservation

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod actor;
pub mod config;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod storage;

// Re-exports
pub use actor::{WalletHandle, WithdrawalOutcome};
pub use config::Config;
pub use error::{Error, Result};
pub use ledger::WalletLedger;
pub use storage::Storage;
