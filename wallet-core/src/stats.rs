//! Wallet statistics aggregation

use crate::types::{Transaction, TransactionKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Summary of a rider's transaction history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletStats {
    /// Sum of all credits (earnings and bonuses)
    pub total_earnings: Decimal,

    /// Sum of absolute values of all debits
    pub total_withdrawals: Decimal,

    /// Sum of credits tagged as bonuses
    pub total_bonuses: Decimal,

    /// Mean credit amount, zero when there are no credits
    pub average_earning: Decimal,

    /// Total entries supplied
    pub transaction_count: usize,
}

impl WalletStats {
    /// Aggregate a transaction history in a single pass
    ///
    /// Input order does not matter; every total is derived in one O(n)
    /// reduction.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut total_earnings = Decimal::ZERO;
        let mut total_withdrawals = Decimal::ZERO;
        let mut total_bonuses = Decimal::ZERO;
        let mut credit_count = 0u64;

        for tx in transactions {
            if tx.is_credit() {
                total_earnings += tx.amount;
                credit_count += 1;

                if tx.kind == TransactionKind::Bonus {
                    total_bonuses += tx.amount;
                }
            } else if tx.is_debit() {
                total_withdrawals += tx.amount.abs();
            }
        }

        let average_earning = if credit_count == 0 {
            Decimal::ZERO
        } else {
            total_earnings / Decimal::from(credit_count)
        };

        Self {
            total_earnings,
            total_withdrawals,
            total_bonuses,
            average_earning,
            transaction_count: transactions.len(),
        }
    }
}
