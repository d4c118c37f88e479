//! Amount validation at the input boundary
//!
//! Raw client input arrives as `f64`; everything past this module is exact
//! `Decimal`. Checks run in a fixed order: finiteness, sign, ceiling,
//! precision.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation limits for monetary input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountLimits {
    /// Single-entry ceiling
    pub max_amount: Decimal,

    /// Maximum decimal places accepted
    pub max_scale: u32,
}

impl Default for AmountLimits {
    fn default() -> Self {
        Self {
            max_amount: Decimal::from(10_000), // $10k per entry
            max_scale: 2,                      // cents
        }
    }
}

/// Why an amount was rejected
///
/// Always returned as a value; the validator never panics on bad input.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum AmountError {
    /// Not a finite number (NaN or infinity)
    #[error("Amount must be a finite number")]
    NotFinite,

    /// Negative input
    #[error("Amount {amount} cannot be negative")]
    Negative {
        /// Offending input
        amount: f64,
    },

    /// Above the configured ceiling
    #[error("Amount {amount} exceeds the maximum of {max}")]
    ExceedsMaximum {
        /// Offending input
        amount: f64,
        /// Configured ceiling
        max: Decimal,
    },

    /// More decimal places than the configured scale
    #[error("Amount {amount} carries more than {max_scale} decimal places")]
    TooPrecise {
        /// Offending input
        amount: Decimal,
        /// Configured scale
        max_scale: u32,
    },
}

impl AmountError {
    /// Stable machine-readable code for API payloads and logs
    pub fn code(&self) -> &'static str {
        match self {
            AmountError::NotFinite => "invalid_type",
            AmountError::Negative { .. } => "negative_amount",
            AmountError::ExceedsMaximum { .. } => "exceeds_maximum",
            AmountError::TooPrecise { .. } => "precision_error",
        }
    }
}

/// Validate a raw monetary value and convert it to exact decimal
pub fn validate_amount(value: f64, limits: &AmountLimits) -> Result<Decimal, AmountError> {
    if !value.is_finite() {
        return Err(AmountError::NotFinite);
    }

    if value < 0.0 {
        return Err(AmountError::Negative { amount: value });
    }

    let ceiling = limits.max_amount.to_f64().unwrap_or(f64::MAX);
    if value > ceiling {
        return Err(AmountError::ExceedsMaximum {
            amount: value,
            max: limits.max_amount,
        });
    }

    // In range now, so conversion cannot overflow the decimal mantissa
    let amount = Decimal::from_f64(value).ok_or(AmountError::NotFinite)?;

    if amount.round_dp(limits.max_scale) != amount {
        return Err(AmountError::TooPrecise {
            amount,
            max_scale: limits.max_scale,
        });
    }

    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(value: f64) -> Result<Decimal, AmountError> {
        validate_amount(value, &AmountLimits::default())
    }

    #[test]
    fn test_valid_amounts() {
        assert_eq!(check(12.34).unwrap(), Decimal::new(1234, 2));
        assert_eq!(check(0.0).unwrap(), Decimal::ZERO);
        assert_eq!(check(10_000.0).unwrap(), Decimal::from(10_000));
        assert_eq!(check(25.5).unwrap(), Decimal::new(255, 1));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(check(f64::NAN).unwrap_err().code(), "invalid_type");
        assert_eq!(check(f64::INFINITY).unwrap_err().code(), "invalid_type");
        assert_eq!(check(f64::NEG_INFINITY).unwrap_err().code(), "invalid_type");
    }

    #[test]
    fn test_negative_rejected() {
        assert_eq!(check(-1.0).unwrap_err().code(), "negative_amount");
        assert_eq!(check(-0.01).unwrap_err().code(), "negative_amount");
    }

    #[test]
    fn test_ceiling_rejected() {
        assert_eq!(check(10_001.0).unwrap_err().code(), "exceeds_maximum");
        // far beyond any decimal mantissa still reads as over the ceiling
        assert_eq!(check(1e300).unwrap_err().code(), "exceeds_maximum");
    }

    #[test]
    fn test_precision_rejected() {
        assert_eq!(check(12.345).unwrap_err().code(), "precision_error");
        assert_eq!(check(0.001).unwrap_err().code(), "precision_error");
    }

    #[test]
    fn test_check_order_sign_before_ceiling() {
        // A negative value with too many decimals reports the sign first
        assert_eq!(check(-12.345).unwrap_err().code(), "negative_amount");
    }

    #[test]
    fn test_error_messages_cite_values() {
        let err = check(10_001.0).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("10001"));
        assert!(msg.contains("10000"));
    }
}
