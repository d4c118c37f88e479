//! Withdrawal policy engine
//!
//! Stateless eligibility decisions, evaluated fresh per request. Refusals
//! are normal outcomes carried in the decision value; committing an allowed
//! withdrawal (opening the hold, writing the debit) is the ledger's job.

use crate::balance::available_balance;
use crate::format::format_usd;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Withdrawal eligibility rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalPolicy {
    /// Smallest withdrawable amount
    pub minimum_withdrawal: Decimal,
}

impl Default for WithdrawalPolicy {
    fn default() -> Self {
        Self {
            minimum_withdrawal: Decimal::from(20), // $20 payout floor
        }
    }
}

/// Outcome of a policy evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalDecision {
    /// Whether a withdrawal may proceed
    pub allowed: bool,

    /// Available balance the decision was made against
    pub available_balance: Decimal,

    /// Human-readable refusal reason, absent when allowed
    pub reason: Option<String>,

    /// Evaluation timestamp
    pub evaluated_at: DateTime<Utc>,
}

impl WithdrawalDecision {
    fn allowed(available: Decimal) -> Self {
        Self {
            allowed: true,
            available_balance: available,
            reason: None,
            evaluated_at: Utc::now(),
        }
    }

    fn refused(available: Decimal, reason: String) -> Self {
        Self {
            allowed: false,
            available_balance: available,
            reason: Some(reason),
            evaluated_at: Utc::now(),
        }
    }
}

impl WithdrawalPolicy {
    /// Create a policy with an explicit payout floor
    pub fn new(minimum_withdrawal: Decimal) -> Self {
        Self { minimum_withdrawal }
    }

    /// Can this wallet withdraw at all?
    ///
    /// Refuses when the available balance sits below the payout floor; the
    /// reason cites both figures as currency.
    pub fn evaluate(
        &self,
        current_balance: Decimal,
        pending_withdrawal: Decimal,
    ) -> WithdrawalDecision {
        let available = available_balance(current_balance, pending_withdrawal);

        if available < self.minimum_withdrawal {
            return WithdrawalDecision::refused(
                available,
                format!(
                    "Available balance {} is below the minimum withdrawal amount {}",
                    format_usd(available),
                    format_usd(self.minimum_withdrawal),
                ),
            );
        }

        WithdrawalDecision::allowed(available)
    }

    /// Can this wallet withdraw a specific amount?
    ///
    /// Applies the payout floor first, then refuses requests above the
    /// available balance.
    pub fn evaluate_request(
        &self,
        current_balance: Decimal,
        pending_withdrawal: Decimal,
        requested: Decimal,
    ) -> WithdrawalDecision {
        let decision = self.evaluate(current_balance, pending_withdrawal);
        if !decision.allowed {
            return decision;
        }

        if requested < self.minimum_withdrawal {
            return WithdrawalDecision::refused(
                decision.available_balance,
                format!(
                    "Requested amount {} is below the minimum withdrawal amount {}",
                    format_usd(requested),
                    format_usd(self.minimum_withdrawal),
                ),
            );
        }

        if requested > decision.available_balance {
            return WithdrawalDecision::refused(
                decision.available_balance,
                format!(
                    "Requested amount {} exceeds the available balance {}",
                    format_usd(requested),
                    format_usd(decision.available_balance),
                ),
            );
        }

        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> WithdrawalPolicy {
        WithdrawalPolicy::default()
    }

    #[test]
    fn test_allowed_with_comfortable_balance() {
        let decision = policy().evaluate(Decimal::from(100), Decimal::ZERO);

        assert!(decision.allowed);
        assert_eq!(decision.available_balance, Decimal::from(100));
        assert!(decision.reason.is_none());
    }

    #[test]
    fn test_refused_below_minimum() {
        let decision = policy().evaluate(Decimal::from(15), Decimal::ZERO);

        assert!(!decision.allowed);
        assert_eq!(decision.available_balance, Decimal::from(15));

        let reason = decision.reason.unwrap();
        assert!(reason.contains("15"));
        assert!(reason.contains("20"));
    }

    #[test]
    fn test_holds_push_wallet_below_minimum() {
        let decision = policy().evaluate(Decimal::from(50), Decimal::from(40));

        assert!(!decision.allowed);
        assert_eq!(decision.available_balance, Decimal::from(10));
    }

    #[test]
    fn test_exact_minimum_is_allowed() {
        let decision = policy().evaluate(Decimal::from(20), Decimal::ZERO);
        assert!(decision.allowed);
    }

    #[test]
    fn test_custom_minimum() {
        let decision =
            WithdrawalPolicy::new(Decimal::from(50)).evaluate(Decimal::from(30), Decimal::ZERO);
        assert!(!decision.allowed);
    }

    #[test]
    fn test_request_above_available_refused() {
        let decision =
            policy().evaluate_request(Decimal::from(100), Decimal::from(30), Decimal::from(80));

        assert!(!decision.allowed);
        assert_eq!(decision.available_balance, Decimal::from(70));
        assert!(decision.reason.unwrap().contains("70"));
    }

    #[test]
    fn test_request_below_minimum_refused() {
        let decision =
            policy().evaluate_request(Decimal::from(100), Decimal::ZERO, Decimal::from(5));

        assert!(!decision.allowed);
        assert!(decision.reason.unwrap().contains("20"));
    }

    #[test]
    fn test_request_within_available_allowed() {
        let decision =
            policy().evaluate_request(Decimal::from(100), Decimal::from(30), Decimal::from(70));
        assert!(decision.allowed);
    }
}
