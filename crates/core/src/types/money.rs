//! Money helpers.
//!
//! The store operates in a single currency (Argentine pesos), so amounts
//! are plain [`Decimal`] values rather than a price-with-currency pair.
//! Decimal arithmetic keeps quote computation exact and idempotent -
//! identical inputs always produce bit-identical totals, which float
//! arithmetic cannot guarantee.

use rust_decimal::Decimal;

/// A whole-peso amount as a `Decimal`.
///
/// Convenience for zone tables and tests: `pesos(500)` reads better than
/// `Decimal::new(500, 0)`.
#[must_use]
pub fn pesos(amount: i64) -> Decimal {
    Decimal::new(amount, 0)
}

/// Format an amount the way the storefront displays it (`$1234.50`).
#[must_use]
pub fn format_pesos(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pesos() {
        assert_eq!(pesos(500).to_string(), "500");
        assert_eq!(pesos(0).to_string(), "0");
    }

    #[test]
    fn test_format_pesos() {
        assert_eq!(format_pesos(pesos(1200)), "$1200.00");
        assert_eq!(format_pesos(Decimal::new(89_99, 2)), "$89.99");
    }
}
