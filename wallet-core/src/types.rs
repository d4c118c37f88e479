//! Core types for the rider wallet
//!
//! All types are designed for:
//! - Deterministic serialization (bincode)
//! - Exact arithmetic (Decimal for money)
//! - Signed amounts: positive = credit, negative = debit

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Rider identifier (platform account id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RiderId(String);

impl RiderId {
    /// Create new rider ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RiderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Categorical tag for a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum TransactionKind {
    /// Delivery earning (credit)
    Earning,
    /// Incentive bonus (credit)
    Bonus,
    /// Withdrawal payout (debit)
    Withdrawal,
}

impl TransactionKind {
    /// Canonical tag used in fingerprints and storage keys
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Earning => "earning",
            TransactionKind::Bonus => "bonus",
            TransactionKind::Withdrawal => "withdrawal",
        }
    }

    /// Parse from canonical tag
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "earning" => Some(TransactionKind::Earning),
            "bonus" => Some(TransactionKind::Bonus),
            "withdrawal" => Some(TransactionKind::Withdrawal),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable ledger entry for a rider's wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID (UUIDv7 for time-ordering)
    pub transaction_id: Uuid,

    /// Owning rider
    pub rider_id: RiderId,

    /// Signed amount: positive = credit, negative = debit
    pub amount: Decimal,

    /// Entry kind
    pub kind: TransactionKind,

    /// Creation instant, immutable once recorded
    pub timestamp: DateTime<Utc>,

    /// Fingerprint over (rider, amount, kind, timestamp)
    pub integrity_hash: String,

    /// Optional free-text note (order reference, payout batch, ...)
    pub note: Option<String>,
}

impl Transaction {
    /// Record a new entry, computing its fingerprint from the four bound
    /// fields.
    pub fn record(
        transaction_id: Uuid,
        rider_id: RiderId,
        amount: Decimal,
        kind: TransactionKind,
        timestamp: DateTime<Utc>,
        note: Option<String>,
    ) -> Self {
        let integrity_hash =
            crate::integrity::fingerprint(&rider_id, amount, kind, timestamp.timestamp_millis());

        Self {
            transaction_id,
            rider_id,
            amount,
            kind,
            timestamp,
            integrity_hash,
            note,
        }
    }

    /// True for earnings and bonuses
    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// True for withdrawals
    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Recompute the fingerprint and compare with the stored one
    pub fn verify_integrity(&self) -> bool {
        crate::integrity::verify(
            &self.rider_id,
            self.amount,
            self.kind,
            self.timestamp.timestamp_millis(),
            &self.integrity_hash,
        )
    }
}

/// An in-flight withdrawal hold, opened when a withdrawal request passes
/// the policy check and released on settlement or cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalHold {
    /// Unique hold ID
    pub hold_id: Uuid,

    /// Held amount (always positive)
    pub amount: Decimal,

    /// When the hold was opened
    pub requested_at: DateTime<Utc>,
}

impl WithdrawalHold {
    /// Open a new hold
    pub fn new(hold_id: Uuid, amount: Decimal, requested_at: DateTime<Utc>) -> Self {
        Self {
            hold_id,
            amount,
            requested_at,
        }
    }
}

/// Materialized per-rider wallet state
///
/// Derived from the transaction history plus open holds; the ledger keeps
/// it consistent transactionally and can always rebuild it from scratch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSnapshot {
    /// Owning rider
    pub rider_id: RiderId,

    /// Sum of all transaction amounts to date
    pub current_balance: Decimal,

    /// Open withdrawal holds
    pub holds: Vec<WithdrawalHold>,

    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl WalletSnapshot {
    /// Fresh empty wallet
    pub fn new(rider_id: RiderId, at: DateTime<Utc>) -> Self {
        Self {
            rider_id,
            current_balance: Decimal::ZERO,
            holds: Vec::new(),
            updated_at: at,
        }
    }

    /// Sum of in-flight withdrawal holds
    pub fn pending_withdrawal(&self) -> Decimal {
        self.holds.iter().map(|h| h.amount).sum()
    }

    /// Balance not committed to any hold, floored at zero
    pub fn available_balance(&self) -> Decimal {
        crate::balance::available_balance(self.current_balance, self.pending_withdrawal())
    }

    /// Fold a transaction into the balance
    pub fn apply(&mut self, transaction: &Transaction) -> crate::Result<()> {
        if transaction.rider_id != self.rider_id {
            return Err(crate::Error::InvalidTransaction(
                "Transaction rider_id mismatch".to_string(),
            ));
        }

        self.current_balance += transaction.amount;
        self.updated_at = transaction.timestamp;

        Ok(())
    }

    /// Attach an open hold
    pub fn open_hold(&mut self, hold: WithdrawalHold) {
        self.holds.push(hold);
    }

    /// Remove and return a hold by ID
    pub fn take_hold(&mut self, hold_id: Uuid) -> Option<WithdrawalHold> {
        let idx = self.holds.iter().position(|h| h.hold_id == hold_id)?;
        Some(self.holds.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(rider: &str, amount: Decimal, kind: TransactionKind) -> Transaction {
        Transaction::record(
            Uuid::new_v4(),
            RiderId::new(rider),
            amount,
            kind,
            Utc::now(),
            None,
        )
    }

    #[test]
    fn test_kind_round_trip() {
        assert_eq!(TransactionKind::parse("earning"), Some(TransactionKind::Earning));
        assert_eq!(TransactionKind::parse("bonus"), Some(TransactionKind::Bonus));
        assert_eq!(TransactionKind::parse("withdrawal"), Some(TransactionKind::Withdrawal));
        assert_eq!(TransactionKind::parse("refund"), None);
    }

    #[test]
    fn test_credit_debit_classification() {
        let earning = tx("RID-1", Decimal::new(2550, 2), TransactionKind::Earning);
        assert!(earning.is_credit());
        assert!(!earning.is_debit());

        let withdrawal = tx("RID-1", Decimal::new(-2000, 2), TransactionKind::Withdrawal);
        assert!(withdrawal.is_debit());
    }

    #[test]
    fn test_recorded_transaction_verifies() {
        let t = tx("RID-7", Decimal::new(1234, 2), TransactionKind::Earning);
        assert!(t.verify_integrity());
    }

    #[test]
    fn test_snapshot_apply_and_rider_mismatch() {
        let mut wallet = WalletSnapshot::new(RiderId::new("RID-1"), Utc::now());

        wallet.apply(&tx("RID-1", Decimal::from(100), TransactionKind::Earning)).unwrap();
        wallet.apply(&tx("RID-1", Decimal::from(-30), TransactionKind::Withdrawal)).unwrap();
        assert_eq!(wallet.current_balance, Decimal::from(70));

        let foreign = tx("RID-2", Decimal::from(10), TransactionKind::Earning);
        assert!(wallet.apply(&foreign).is_err());
        assert_eq!(wallet.current_balance, Decimal::from(70));
    }

    #[test]
    fn test_holds_lower_available_balance() {
        let mut wallet = WalletSnapshot::new(RiderId::new("RID-1"), Utc::now());
        wallet.apply(&tx("RID-1", Decimal::from(100), TransactionKind::Earning)).unwrap();

        let hold_id = Uuid::new_v4();
        wallet.open_hold(WithdrawalHold::new(hold_id, Decimal::from(40), Utc::now()));

        assert_eq!(wallet.pending_withdrawal(), Decimal::from(40));
        assert_eq!(wallet.available_balance(), Decimal::from(60));

        let released = wallet.take_hold(hold_id).unwrap();
        assert_eq!(released.amount, Decimal::from(40));
        assert_eq!(wallet.available_balance(), Decimal::from(100));
        assert!(wallet.take_hold(hold_id).is_none());
    }
}
