//! Proration result model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The share of a month's compensation earned from a start date to month end.
///
/// # Example
///
/// ```
/// use payroll_engine::models::ProrationResult;
/// use rust_decimal::Decimal;
///
/// let result = ProrationResult {
///     prorated_amount: Decimal::new(150000, 2),
///     working_days_used: 10,
///     total_working_days_in_month: 20,
///     month_name: "February".to_string(),
/// };
/// assert_eq!(result.working_days_used * 2, result.total_working_days_in_month);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProrationResult {
    /// Monthly compensation scaled by the working-day ratio, two decimals.
    pub prorated_amount: Decimal,
    /// Weekdays from the start date through month end, both inclusive.
    pub working_days_used: u32,
    /// Weekdays in the whole month.
    pub total_working_days_in_month: u32,
    /// English name of the month ("February").
    pub month_name: String,
}
