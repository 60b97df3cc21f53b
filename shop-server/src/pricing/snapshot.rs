//! Price Snapshot Calculator
//!
//! Computes the net unit price captured on order items at transfer or
//! recalculation time. Uses rust_decimal for precise calculations,
//! stores as f64.

use crate::utils::{AppError, AppResult};
use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Net unit price after the catalog discount.
///
/// `price` must be finite and >= 0, `discount_percent` within 0..=100.
/// The division runs at full Decimal precision; rounding happens once,
/// at the end, half-up to 2 decimal places. Pure and deterministic.
pub fn discounted_unit_price(price: f64, discount_percent: f64) -> AppResult<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::Invalid(format!(
            "price must be a finite value >= 0, got {price}"
        )));
    }
    if !discount_percent.is_finite() || !(0.0..=100.0).contains(&discount_percent) {
        return Err(AppError::Invalid(format!(
            "discount percent must be between 0 and 100, got {discount_percent}"
        )));
    }

    if discount_percent == 0.0 {
        return Ok(to_f64(to_decimal(price)));
    }
    if discount_percent == 100.0 {
        return Ok(0.0);
    }

    let base = to_decimal(price);
    let pct = to_decimal(discount_percent);
    let net = base - base * pct / Decimal::ONE_HUNDRED;
    Ok(to_f64(net))
}

/// Line total over an already-rounded unit price, computed in Decimal to
/// keep repeated f64 additions from drifting.
pub fn line_total(unit_price: f64, quantity: i64) -> f64 {
    to_f64(to_decimal(unit_price) * Decimal::from(quantity))
}

/// Sum monetary values in Decimal, rounding once at the end
pub fn sum(values: impl IntoIterator<Item = f64>) -> f64 {
    to_f64(values.into_iter().map(to_decimal).sum::<Decimal>())
}
