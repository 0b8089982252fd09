//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for storage/serialization.

use rust_decimal::prelude::*;
use shared::models::OrderItemInput;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Normalise a unit price to whole cents
///
/// Prices enter orders rounded, so the stored total is exactly the sum of
/// the stored lines.
pub fn round_price(price: f64) -> f64 {
    to_f64(to_decimal(price))
}

/// Line subtotal: quantity × unit price
pub fn line_subtotal(quantity: i32, unit_price: f64) -> Decimal {
    to_decimal(unit_price) * Decimal::from(quantity)
}

/// Order total: Σ quantity × unit_price over the draft lines
pub fn order_total(items: &[OrderItemInput]) -> f64 {
    let total: Decimal = items
        .iter()
        .map(|item| line_subtotal(item.quantity, item.unit_price))
        .sum();
    to_f64(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i32, unit_price: f64) -> OrderItemInput {
        OrderItemInput {
            product_id: 1,
            product_name: "Item".to_string(),
            quantity,
            unit_price,
            note: None,
        }
    }

    #[test]
    fn test_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let a = to_decimal(0.1);
        let b = to_decimal(0.2);
        assert_eq!(to_f64(a + b), 0.3);
    }

    #[test]
    fn test_order_total() {
        assert_eq!(order_total(&[line(2, 1000.0), line(1, 500.0)]), 2500.0);
        assert_eq!(order_total(&[]), 0.0);
    }

    #[test]
    fn test_accumulation_does_not_drift() {
        let items: Vec<_> = (0..100).map(|_| line(1, 0.01)).collect();
        assert_eq!(order_total(&items), 1.0);

        let items = vec![line(3, 3.33), line(7, 1.15)];
        assert_eq!(order_total(&items), 18.04);
    }

    #[test]
    fn test_round_price_to_cents() {
        assert_eq!(round_price(0.125), 0.13);
        assert_eq!(round_price(0.333), 0.33);
        assert_eq!(round_price(12.5), 12.5);

        let items = vec![line(1, round_price(0.125)), line(3, round_price(0.333))];
        assert_eq!(order_total(&items), 1.12);
    }

    #[test]
    fn test_rounding_half_up() {
        assert_eq!(to_f64(Decimal::new(1005, 3)), 1.01);
        assert_eq!(to_f64(Decimal::new(-1005, 3)), -1.01);
    }
}
