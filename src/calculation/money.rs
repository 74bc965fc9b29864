//! Monetary rounding and input validation helpers.
//!
//! Calculations run at full [`Decimal`] precision and only round at the final
//! step, so a long list of contribution lines does not accumulate rounding
//! error.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Decimal places used for displayed money amounts.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Decimal places used for displayed rates and fractions.
pub const RATE_DECIMAL_PLACES: u32 = 4;

/// Rounds an amount to two decimals, half away from zero.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("10.005").unwrap()), Decimal::from_str("10.01").unwrap());
/// assert_eq!(round_money(Decimal::from_str("-10.005").unwrap()), Decimal::from_str("-10.01").unwrap());
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a rate or fraction to four decimals, half away from zero.
pub fn round_rate(rate: Decimal) -> Decimal {
    rate.round_dp_with_strategy(RATE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a caller-supplied floating point amount to a [`Decimal`].
///
/// NaN and infinite values cannot be represented and are rejected with
/// [`EngineError::InvalidInput`] naming `field`. Sign checks are left to the
/// calculator that consumes the amount, and so are magnitude checks: a cost
/// breakdown whose totals would overflow `Decimal` fails with an error.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::amount_from_f64;
///
/// assert!(amount_from_f64("gross_annual", 60000.0).is_ok());
/// assert!(amount_from_f64("gross_annual", f64::NAN).is_err());
/// ```
pub fn amount_from_f64(field: &str, value: f64) -> EngineResult<Decimal> {
    if !value.is_finite() {
        return Err(EngineError::invalid_input(
            field,
            format!("must be a finite number, got {}", value),
        ));
    }

    Decimal::from_f64(value)
        .ok_or_else(|| EngineError::invalid_input(field, format!("{} is out of range", value)))
}
