//! Money calculation utilities using rust_decimal for precision
//!
//! All payroll arithmetic is done in `Decimal` internally, then converted to
//! `f64` for storage/serialization, rounded to 2 decimal places half-up.

use rust_decimal::prelude::*;

use shared::models::AdjustmentInput;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed adjustment amount
const MAX_ADJUSTMENT_AMOUNT: f64 = 1_000_000.0;

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

/// Filter caller-supplied adjustments down to the usable ones.
///
/// Invalid items — empty name, non-finite or non-positive amount, absurdly
/// large amount — are silently dropped rather than failing the whole slip.
pub fn filter_adjustments(adjustments: Vec<AdjustmentInput>) -> Vec<AdjustmentInput> {
    adjustments
        .into_iter()
        .filter(|adj| {
            if adj.name.trim().is_empty() {
                tracing::debug!("Dropping adjustment with empty name");
                return false;
            }
            if !adj.amount.is_finite() || adj.amount <= 0.0 {
                tracing::debug!(
                    name = %adj.name,
                    amount = adj.amount,
                    "Dropping adjustment with invalid amount"
                );
                return false;
            }
            if adj.amount > MAX_ADJUSTMENT_AMOUNT {
                tracing::debug!(
                    name = %adj.name,
                    amount = adj.amount,
                    "Dropping adjustment exceeding maximum"
                );
                return false;
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::AdjustmentKind;

    fn adj(name: &str, amount: f64, kind: AdjustmentKind) -> AdjustmentInput {
        AdjustmentInput {
            name: name.to_string(),
            amount,
            kind,
        }
    }

    #[test]
    fn test_to_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let sum_f64 = 0.1_f64 + 0.2_f64;
        assert_ne!(sum_f64, 0.3);

        let sum_dec = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_rounding_half_up() {
        let value = Decimal::new(5, 3); // 0.005
        assert_eq!(to_f64(value), 0.01);

        let value = Decimal::new(4, 3); // 0.004
        assert_eq!(to_f64(value), 0.0);
    }

    #[test]
    fn test_to_decimal_nan_becomes_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }

    #[test]
    fn test_filter_keeps_valid_adjustments() {
        let kept = filter_adjustments(vec![
            adj("Referral bonus", 500.0, AdjustmentKind::Addition),
            adj("Equipment damage", 120.5, AdjustmentKind::Deduction),
        ]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_filter_drops_invalid_items_silently() {
        let kept = filter_adjustments(vec![
            adj("", 500.0, AdjustmentKind::Addition),          // empty name
            adj("   ", 500.0, AdjustmentKind::Addition),       // whitespace name
            adj("Zero", 0.0, AdjustmentKind::Deduction),       // non-positive
            adj("Negative", -50.0, AdjustmentKind::Deduction), // negative
            adj("NaN", f64::NAN, AdjustmentKind::Addition),    // non-finite
            adj("Huge", 2_000_000.0, AdjustmentKind::Addition),
            adj("Bonus", 250.0, AdjustmentKind::Addition), // the only valid one
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Bonus");
    }
}
