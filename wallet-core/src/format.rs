//! Currency rendering for user-facing reason strings
//!
//! Venezuelan-Spanish USD notation: `US$` prefix, `.` thousands grouping,
//! `,` decimal separator, two decimal places. Formatting only; decisions
//! never depend on this output.

use rust_decimal::Decimal;

/// Render an amount as es-VE USD, e.g. `US$1.234,56`
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded < Decimal::ZERO;

    let plain = format!("{:.2}", rounded.abs());
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    if negative {
        format!("-US${},{}", grouped, fraction)
    } else {
        format!("US${},{}", grouped, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_amounts() {
        assert_eq!(format_usd(Decimal::from(20)), "US$20,00");
        assert_eq!(format_usd(Decimal::new(1550, 2)), "US$15,50");
        assert_eq!(format_usd(Decimal::ZERO), "US$0,00");
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(format_usd(Decimal::new(123450, 2)), "US$1.234,50");
        assert_eq!(format_usd(Decimal::from(1_000_000)), "US$1.000.000,00");
        assert_eq!(format_usd(Decimal::from(999)), "US$999,00");
        assert_eq!(format_usd(Decimal::from(1000)), "US$1.000,00");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(format_usd(Decimal::from(-5)), "-US$5,00");
        assert_eq!(format_usd(Decimal::new(-123456, 2)), "-US$1.234,56");
    }

    #[test]
    fn test_rounds_to_cents() {
        assert_eq!(format_usd(Decimal::new(12344, 3)), "US$12,34");
    }
}
