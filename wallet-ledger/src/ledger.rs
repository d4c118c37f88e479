//! Main ledger orchestration layer
//!
//! Ties together validation, storage, and the actor into a high-level API
//! for wallet operations.
//!
//! # Example
//!
//! ```no_run
//! use wallet_ledger::{Config, WalletLedger};
//! use wallet_core::{RiderId, TransactionKind};
//!
//! #[tokio::main]
//! async fn main() -> wallet_ledger::Result<()> {
//!     let ledger = WalletLedger::open(Config::default()).await?;
//!
//!     let rider = RiderId::new("RID-001");
//!     ledger.credit(rider.clone(), 25.50, TransactionKind::Earning, None).await?;
//!
//!     let outcome = ledger.request_withdrawal(rider, 20.0).await?;
//!     println!("allowed: {}", outcome.decision.allowed);
//!
//!     Ok(())
//! }
//! ```

use crate::{
    actor::{spawn_wallet_actor, WalletHandle, WithdrawalOutcome},
    metrics::Metrics,
    storage::StorageStats,
    Config, Error, Result, Storage,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;
use wallet_core::{
    validate_amount, AmountLimits, RiderId, Transaction, TransactionKind, WalletSnapshot,
    WalletStats,
};

/// Main wallet ledger interface
#[derive(Debug)]
pub struct WalletLedger {
    /// Actor handle for serialized mutation
    handle: WalletHandle,

    /// Direct storage access (for maintenance reads)
    storage: Arc<Storage>,

    /// Input amount limits
    limits: AmountLimits,

    /// Metrics collector
    metrics: Metrics,
}

impl WalletLedger {
    /// Open ledger with configuration
    pub async fn open(config: Config) -> Result<Self> {
        let storage = Arc::new(Storage::open(&config)?);

        let metrics = Metrics::new().map_err(|e| Error::Other(e.to_string()))?;

        let handle = spawn_wallet_actor(storage.clone(), config.wallet.policy());

        Ok(Self {
            handle,
            storage,
            limits: config.wallet.limits(),
            metrics,
        })
    }

    /// Credit an earning or bonus to a rider's wallet
    ///
    /// Validates the raw amount, records a fingerprinted transaction, and
    /// commits it atomically. Returns the transaction id.
    pub async fn credit(
        &self,
        rider_id: RiderId,
        amount: f64,
        kind: TransactionKind,
        note: Option<String>,
    ) -> Result<Uuid> {
        if kind == TransactionKind::Withdrawal {
            return Err(Error::InvalidTransaction(
                "Credits must be earnings or bonuses".to_string(),
            ));
        }

        let amount = validate_amount(amount, &self.limits)?;
        if amount.is_zero() {
            return Err(Error::InvalidTransaction(
                "Credit amount must be positive".to_string(),
            ));
        }

        let transaction =
            Transaction::record(Uuid::now_v7(), rider_id, amount, kind, Utc::now(), note);

        let started = Instant::now();
        let id = self.handle.append_transaction(transaction).await?;
        self.metrics
            .record_commit_duration(started.elapsed().as_secs_f64());
        self.metrics.record_transaction();

        Ok(id)
    }

    /// Request a withdrawal
    ///
    /// The amount is validated here; the policy check and the hold commit
    /// run inside the actor as one serialized unit. A refusal comes back as
    /// a normal outcome, not an error.
    pub async fn request_withdrawal(
        &self,
        rider_id: RiderId,
        amount: f64,
    ) -> Result<WithdrawalOutcome> {
        let amount = validate_amount(amount, &self.limits)?;

        let outcome = self.handle.request_withdrawal(rider_id, amount).await?;
        self.metrics
            .record_withdrawal_decision(outcome.decision.allowed);

        Ok(outcome)
    }

    /// Settle a withdrawal hold: append the debit and release the hold
    ///
    /// Settlement never changes the available balance; the current balance
    /// and the pending total both drop by the held amount.
    pub async fn settle_withdrawal(&self, rider_id: RiderId, hold_id: Uuid) -> Result<Uuid> {
        let started = Instant::now();
        let id = self.handle.settle_withdrawal(rider_id, hold_id).await?;
        self.metrics
            .record_commit_duration(started.elapsed().as_secs_f64());
        self.metrics.record_transaction();

        Ok(id)
    }

    /// Cancel a withdrawal hold without a debit
    pub async fn cancel_withdrawal(&self, rider_id: RiderId, hold_id: Uuid) -> Result<()> {
        self.handle.cancel_withdrawal(rider_id, hold_id).await
    }

    /// Get a rider's wallet snapshot
    pub async fn wallet(&self, rider_id: RiderId) -> Result<WalletSnapshot> {
        self.handle.get_wallet(rider_id).await
    }

    /// Get a rider's full transaction history
    pub async fn transactions(&self, rider_id: RiderId) -> Result<Vec<Transaction>> {
        self.handle.get_transactions(rider_id).await
    }

    /// Get transaction by ID
    pub async fn transaction(&self, transaction_id: Uuid) -> Result<Transaction> {
        self.handle.get_transaction(transaction_id).await
    }

    /// Aggregate a rider's history into wallet statistics
    pub async fn stats(&self, rider_id: RiderId) -> Result<WalletStats> {
        let transactions = self.transactions(rider_id).await?;
        Ok(WalletStats::from_transactions(&transactions))
    }

    /// Re-verify every stored fingerprint for a rider
    ///
    /// Returns the number of verified transactions, or the first mismatch.
    pub async fn verify_transactions(&self, rider_id: RiderId) -> Result<usize> {
        let transactions = self.transactions(rider_id).await?;

        for transaction in &transactions {
            if !transaction.verify_integrity() {
                self.metrics.record_integrity_failure();
                return Err(Error::IntegrityMismatch(
                    transaction.transaction_id.to_string(),
                ));
            }
        }

        Ok(transactions.len())
    }

    /// Rebuild wallet state from the transaction history
    ///
    /// Recomputes the current balance from scratch. Open holds live only on
    /// the stored snapshot, so the rebuilt state carries none.
    pub async fn rebuild_wallet_state(&self, rider_id: RiderId) -> Result<WalletSnapshot> {
        let transactions = self.transactions(rider_id.clone()).await?;

        let mut wallet = WalletSnapshot::new(rider_id, Utc::now());
        for transaction in &transactions {
            wallet.apply(transaction)?;
        }

        Ok(wallet)
    }

    /// Check balance conservation
    ///
    /// The stored snapshot balance must equal the sum of all recorded
    /// transaction amounts.
    pub async fn check_balance_conservation(&self, rider_id: RiderId) -> Result<bool> {
        let stored = self.wallet(rider_id.clone()).await?;
        let rebuilt = self.rebuild_wallet_state(rider_id).await?;

        Ok(stored.current_balance == rebuilt.current_balance)
    }

    /// Get storage statistics, refreshing the wallet gauge
    pub fn storage_stats(&self) -> Result<StorageStats> {
        let stats = self.storage.get_stats()?;
        self.metrics.update_tracked_wallets(stats.total_wallets as i64);
        Ok(stats)
    }

    /// Get metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Shutdown ledger
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    async fn create_test_ledger() -> (WalletLedger, tempfile::TempDir) {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.data_dir = temp_dir.path().to_path_buf();

        (WalletLedger::open(config).await.unwrap(), temp_dir)
    }

    #[tokio::test]
    async fn test_ledger_open() {
        let (ledger, _temp) = create_test_ledger().await;
        ledger.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_credit_and_retrieve() {
        let (ledger, _temp) = create_test_ledger().await;
        let rider = RiderId::new("RID-001");

        let id = ledger
            .credit(rider.clone(), 25.50, TransactionKind::Earning, None)
            .await
            .unwrap();

        let transaction = ledger.transaction(id).await.unwrap();
        assert_eq!(transaction.amount, Decimal::new(2550, 2));
        assert!(transaction.verify_integrity());

        let wallet = ledger.wallet(rider).await.unwrap();
        assert_eq!(wallet.current_balance, Decimal::new(2550, 2));

        ledger.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_credit_rejects_bad_input() {
        let (ledger, _temp) = create_test_ledger().await;
        let rider = RiderId::new("RID-002");

        // Withdrawal is not a credit kind
        let result = ledger
            .credit(rider.clone(), 10.0, TransactionKind::Withdrawal, None)
            .await;
        assert!(matches!(result, Err(Error::InvalidTransaction(_))));

        // Validator failures surface as InvalidAmount
        for bad in [f64::NAN, -5.0, 10_001.0, 12.345] {
            let result = ledger
                .credit(rider.clone(), bad, TransactionKind::Earning, None)
                .await;
            assert!(matches!(result, Err(Error::InvalidAmount(_))), "{}", bad);
        }

        // Zero credits are pointless
        let result = ledger
            .credit(rider, 0.0, TransactionKind::Earning, None)
            .await;
        assert!(matches!(result, Err(Error::InvalidTransaction(_))));

        ledger.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_full_withdrawal_flow() {
        let (ledger, _temp) = create_test_ledger().await;
        let rider = RiderId::new("RID-003");

        ledger
            .credit(rider.clone(), 80.0, TransactionKind::Earning, None)
            .await
            .unwrap();
        ledger
            .credit(rider.clone(), 20.0, TransactionKind::Bonus, None)
            .await
            .unwrap();

        let outcome = ledger
            .request_withdrawal(rider.clone(), 60.0)
            .await
            .unwrap();
        assert!(outcome.decision.allowed);
        assert_eq!(outcome.decision.available_balance, Decimal::from(100));

        let hold_id = outcome.hold_id.unwrap();
        let available_before = ledger.wallet(rider.clone()).await.unwrap().available_balance();

        ledger
            .settle_withdrawal(rider.clone(), hold_id)
            .await
            .unwrap();

        let wallet = ledger.wallet(rider.clone()).await.unwrap();
        assert_eq!(wallet.current_balance, Decimal::from(40));
        assert_eq!(wallet.available_balance(), available_before);

        assert!(ledger.check_balance_conservation(rider.clone()).await.unwrap());

        let stats = ledger.stats(rider).await.unwrap();
        assert_eq!(stats.total_earnings, Decimal::from(100));
        assert_eq!(stats.total_bonuses, Decimal::from(20));
        assert_eq!(stats.total_withdrawals, Decimal::from(60));
        assert_eq!(stats.transaction_count, 3);

        ledger.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_refusal_is_a_soft_outcome() {
        let (ledger, _temp) = create_test_ledger().await;
        let rider = RiderId::new("RID-004");

        ledger
            .credit(rider.clone(), 15.0, TransactionKind::Earning, None)
            .await
            .unwrap();

        let outcome = ledger.request_withdrawal(rider, 15.0).await.unwrap();
        assert!(!outcome.decision.allowed);
        assert!(outcome.hold_id.is_none());

        let reason = outcome.decision.reason.unwrap();
        assert!(reason.contains("15"));
        assert!(reason.contains("20"));

        ledger.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_restores_available_balance() {
        let (ledger, _temp) = create_test_ledger().await;
        let rider = RiderId::new("RID-005");

        ledger
            .credit(rider.clone(), 100.0, TransactionKind::Earning, None)
            .await
            .unwrap();

        let outcome = ledger
            .request_withdrawal(rider.clone(), 40.0)
            .await
            .unwrap();
        let hold_id = outcome.hold_id.unwrap();

        ledger
            .cancel_withdrawal(rider.clone(), hold_id)
            .await
            .unwrap();

        let wallet = ledger.wallet(rider.clone()).await.unwrap();
        assert_eq!(wallet.available_balance(), Decimal::from(100));

        // No debit was recorded
        let stats = ledger.stats(rider).await.unwrap();
        assert_eq!(stats.total_withdrawals, Decimal::ZERO);

        ledger.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_verify_transactions() {
        let (ledger, _temp) = create_test_ledger().await;
        let rider = RiderId::new("RID-006");

        for _ in 0..4 {
            ledger
                .credit(rider.clone(), 12.5, TransactionKind::Earning, None)
                .await
                .unwrap();
        }

        assert_eq!(ledger.verify_transactions(rider).await.unwrap(), 4);

        ledger.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_storage_stats_updates_gauge() {
        let (ledger, _temp) = create_test_ledger().await;

        ledger
            .credit(RiderId::new("RID-007"), 10.0, TransactionKind::Earning, None)
            .await
            .unwrap();

        let stats = ledger.storage_stats().unwrap();
        assert_eq!(stats.total_wallets, 1);
        assert_eq!(ledger.metrics().tracked_wallets.get(), 1);

        ledger.shutdown().await.unwrap();
    }
}
