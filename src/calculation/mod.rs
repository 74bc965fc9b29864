//! Calculation logic for the payroll engine.
//!
//! This module contains the business-day calendar, per-country employment
//! cost calculation with income tax estimation, monthly contractor payment
//! schedules, and working-day proration of monthly compensation.

mod business_days;
mod cost;
mod income_tax;
mod money;
mod payment_schedule;
mod proration;

pub use business_days::{
    DayType, add_business_days, count_weekdays, first_day_of_month, get_day_type, is_weekend,
    last_business_day_of_month, last_day_of_month, next_business_day, previous_business_day,
};
pub use cost::{CostCalculator, calculate_costs};
pub use income_tax::{
    BandedEstimate, DE_INCOME_TAX, FR_INCOME_TAX, GB_INCOME_TAX, TaxEstimator, TaxEstimators,
    compute_income_tax, progressive_tax, taxable_base,
};
pub use money::{MONEY_DECIMAL_PLACES, RATE_DECIMAL_PLACES, amount_from_f64, round_money, round_rate};
pub use payment_schedule::{
    INVOICE_DUE_DAY, PREFUNDING_DUE_CALENDAR_DAYS, PREFUNDING_SENT_BUSINESS_DAYS, build_events,
};
pub use proration::{calculate_proration, calculate_proration_from_str};
