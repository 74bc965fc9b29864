//! Working-day proration of monthly compensation.
//!
//! Compensation for a partial first month is scaled by the share of the
//! month's weekdays that fall on or after the start date.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::ProrationResult;

use super::business_days::{count_weekdays, first_day_of_month, last_day_of_month};
use super::money::round_money;

/// Prorates `monthly_compensation` from `start_date` through month end.
///
/// Both the start date and the last day of the month are counted. A start on
/// or before the first business day yields exactly the monthly compensation.
/// Otherwise the amount is multiplied before it is divided, falling back to
/// dividing first only when the product would overflow `Decimal`, and rounded
/// to two decimals once at the end.
///
/// # Returns
///
/// Returns the [`ProrationResult`], or `InvalidInput` when
/// `monthly_compensation` is zero or negative.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_proration;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// // February 2025 has 20 weekdays; the 17th leaves 10 of them.
/// let start = NaiveDate::from_ymd_opt(2025, 2, 17).unwrap();
/// let result = calculate_proration(start, Decimal::new(3000, 0)).unwrap();
/// assert_eq!(result.working_days_used, 10);
/// assert_eq!(result.total_working_days_in_month, 20);
/// assert_eq!(result.prorated_amount, Decimal::new(1500, 0));
/// assert_eq!(result.month_name, "February");
/// ```
pub fn calculate_proration(
    start_date: NaiveDate,
    monthly_compensation: Decimal,
) -> EngineResult<ProrationResult> {
    if monthly_compensation <= Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "monthly_compensation",
            format!("must be a positive amount, got {}", monthly_compensation),
        ));
    }

    let first = first_day_of_month(start_date.year(), start_date.month0())?;
    let last = last_day_of_month(start_date.year(), start_date.month0())?;

    let total_working_days_in_month = count_weekdays(first, last);
    let working_days_used = count_weekdays(start_date, last);

    if total_working_days_in_month == 0 {
        return Err(EngineError::CalculationError {
            message: format!("no working days in the month of {}", start_date),
        });
    }

    let prorated_amount = if working_days_used == total_working_days_in_month {
        Some(monthly_compensation)
    } else {
        let used = Decimal::from(working_days_used);
        let total = Decimal::from(total_working_days_in_month);
        // Divide-first fallback cannot overflow: used < total.
        monthly_compensation
            .checked_mul(used)
            .and_then(|scaled| scaled.checked_div(total))
            .or_else(|| {
                monthly_compensation
                    .checked_div(total)
                    .and_then(|per_day| per_day.checked_mul(used))
            })
    }
    .map(round_money)
    .ok_or_else(|| EngineError::CalculationError {
        message: format!(
            "cannot prorate {} over {} of {} working days",
            monthly_compensation, working_days_used, total_working_days_in_month
        ),
    })?;

    debug!(
        start_date = %start_date,
        working_days_used,
        total_working_days_in_month,
        prorated_amount = %prorated_amount,
        "Proration calculated"
    );

    Ok(ProrationResult {
        prorated_amount,
        working_days_used,
        total_working_days_in_month,
        month_name: start_date.format("%B").to_string(),
    })
}

/// Like [`calculate_proration`], with the start date given as `YYYY-MM-DD`.
///
/// Text that is not a valid calendar date (including impossible dates such as
/// `2025-02-30`) fails with `InvalidInput`.
pub fn calculate_proration_from_str(
    start_date: &str,
    monthly_compensation: Decimal,
) -> EngineResult<ProrationResult> {
    let parsed = NaiveDate::parse_from_str(start_date.trim(), "%Y-%m-%d").map_err(|e| {
        EngineError::invalid_input(
            "start_date",
            format!("'{}' is not a valid date: {}", start_date, e),
        )
    })?;

    calculate_proration(parsed, monthly_compensation)
}
