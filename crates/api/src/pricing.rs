//! Order pricing.
//!
//! The server recomputes every order total from its line items and never
//! trusts a client-supplied figure. Flat shipping, fixed tax rate, all
//! arithmetic in `Decimal`.

use rust_decimal::Decimal;

/// Flat shipping fee applied to every order (10.00).
#[must_use]
pub fn shipping_fee() -> Decimal {
    Decimal::new(1000, 2)
}

/// Sales tax rate applied to the item subtotal, not to shipping (8%).
#[must_use]
pub fn tax_rate() -> Decimal {
    Decimal::new(8, 2)
}

/// Client totals within one cent of the server's figure are accepted as
/// rounding noise; anything larger is rejected.
#[must_use]
pub fn total_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// A priced order line.
#[derive(Debug, Clone, Copy)]
pub struct PricedLine {
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// Breakdown of an order's price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Compute the order totals for a set of lines.
///
/// Tax is charged on the item subtotal only and rounded to cents before
/// being added, matching what the client displays.
#[must_use]
pub fn compute_totals(lines: &[PricedLine]) -> OrderTotals {
    let subtotal: Decimal = lines
        .iter()
        .map(|line| line.unit_price * Decimal::from(line.quantity))
        .sum();

    let tax = (subtotal * tax_rate()).round_dp(2);
    let total = (subtotal + shipping_fee() + tax).round_dp(2);

    OrderTotals {
        subtotal,
        shipping: shipping_fee(),
        tax,
        total,
    }
}

/// Whether a client-submitted total matches the server's computation.
#[must_use]
pub fn totals_match(client_total: Decimal, server_total: Decimal) -> bool {
    (client_total - server_total).abs() <= total_tolerance()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn test_empty_order_is_shipping_only() {
        let totals = compute_totals(&[]);
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.tax, Decimal::ZERO.round_dp(2));
        assert_eq!(totals.total, dec(10_00));
    }

    #[test]
    fn test_single_line() {
        let totals = compute_totals(&[PricedLine {
            unit_price: dec(100_00),
            quantity: 1,
        }]);
        assert_eq!(totals.subtotal, dec(100_00));
        assert_eq!(totals.shipping, dec(10_00));
        assert_eq!(totals.tax, dec(8_00));
        assert_eq!(totals.total, dec(118_00));
    }

    #[test]
    fn test_multiple_lines_with_quantities() {
        let totals = compute_totals(&[
            PricedLine {
                unit_price: dec(24_99),
                quantity: 2,
            },
            PricedLine {
                unit_price: dec(5_50),
                quantity: 3,
            },
        ]);
        // 49.98 + 16.50 = 66.48; tax = 5.3184 -> 5.32
        assert_eq!(totals.subtotal, dec(66_48));
        assert_eq!(totals.tax, dec(5_32));
        assert_eq!(totals.total, dec(81_80));
    }

    #[test]
    fn test_tax_rounds_to_cents() {
        let totals = compute_totals(&[PricedLine {
            unit_price: dec(13),
            quantity: 1,
        }]);
        // 0.13 * 0.08 = 0.0104 -> 0.01
        assert_eq!(totals.tax, dec(1));
        assert_eq!(totals.total, dec(10_14));
    }

    #[test]
    fn test_totals_match_within_tolerance() {
        assert!(totals_match(dec(118_00), dec(118_00)));
        assert!(totals_match(dec(118_01), dec(118_00)));
        assert!(totals_match(dec(117_99), dec(118_00)));
        assert!(!totals_match(dec(118_02), dec(118_00)));
        assert!(!totals_match(dec(100_00), dec(118_00)));
    }
}
