//! Available-balance derivation

use rust_decimal::Decimal;

/// Balance not committed to any withdrawal hold
///
/// `max(0, current_balance - pending_withdrawal)`. Pending holds can exceed
/// the current balance when holds were over-committed; the result floors at
/// zero so callers always get a spendable figure, and the overdraft is
/// logged for investigation.
pub fn available_balance(current_balance: Decimal, pending_withdrawal: Decimal) -> Decimal {
    let available = current_balance - pending_withdrawal;

    if available < Decimal::ZERO {
        tracing::warn!(
            %current_balance,
            %pending_withdrawal,
            "pending holds exceed current balance, flooring available balance at zero"
        );
        return Decimal::ZERO;
    }

    available
}
