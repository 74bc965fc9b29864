//! Business-day calendar.
//!
//! This module classifies dates and moves across weekends under a fixed
//! Monday to Friday business week. There is no holiday table: every weekday is
//! a business day.

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Represents the type of day for business-day arithmetic.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::DayType;
///
/// let day_type = DayType::Saturday;
/// assert_eq!(format!("{:?}", day_type), "Saturday");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    /// Monday through Friday.
    Weekday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayType::Weekday => write!(f, "Weekday"),
            DayType::Saturday => write!(f, "Saturday"),
            DayType::Sunday => write!(f, "Sunday"),
        }
    }
}

/// Determines the day type for a given date.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{get_day_type, DayType};
/// use chrono::NaiveDate;
///
/// // 2026-01-17 is a Saturday
/// let saturday = NaiveDate::from_ymd_opt(2026, 1, 17).unwrap();
/// assert_eq!(get_day_type(saturday), DayType::Saturday);
///
/// // 2026-01-12 is a Monday
/// let monday = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();
/// assert_eq!(get_day_type(monday), DayType::Weekday);
/// ```
pub fn get_day_type(date: NaiveDate) -> DayType {
    match date.weekday() {
        Weekday::Sat => DayType::Saturday,
        Weekday::Sun => DayType::Sunday,
        _ => DayType::Weekday,
    }
}

/// Returns true iff the date falls on a Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    get_day_type(date) != DayType::Weekday
}

/// Walks backward one day at a time until a business day is reached.
///
/// A date that is already a business day is returned unchanged.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::previous_business_day;
/// use chrono::NaiveDate;
///
/// // Sunday 2026-01-18 resolves to Friday 2026-01-16
/// let sunday = NaiveDate::from_ymd_opt(2026, 1, 18).unwrap();
/// assert_eq!(previous_business_day(sunday), NaiveDate::from_ymd_opt(2026, 1, 16).unwrap());
/// ```
pub fn previous_business_day(date: NaiveDate) -> NaiveDate {
    let mut current = date;
    while is_weekend(current) {
        let Some(previous) = current.pred_opt() else {
            break;
        };
        current = previous;
    }
    current
}

/// Walks forward one day at a time until a business day is reached.
///
/// A date that is already a business day is returned unchanged.
pub fn next_business_day(date: NaiveDate) -> NaiveDate {
    let mut current = date;
    while is_weekend(current) {
        let Some(next) = current.succ_opt() else {
            break;
        };
        current = next;
    }
    current
}

/// Advances `date` by exactly `days` business days, skipping weekends.
///
/// `days == 0` returns the input unchanged, even when it is a weekend; callers
/// normalize first where that matters.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::add_business_days;
/// use chrono::NaiveDate;
///
/// // Thursday + 2 business days = Monday
/// let thursday = NaiveDate::from_ymd_opt(2025, 2, 20).unwrap();
/// assert_eq!(add_business_days(thursday, 2), NaiveDate::from_ymd_opt(2025, 2, 24).unwrap());
/// ```
pub fn add_business_days(date: NaiveDate, days: u32) -> NaiveDate {
    let mut current = date;
    let mut remaining = days;
    while remaining > 0 {
        let Some(next) = current.succ_opt() else {
            break;
        };
        current = next;
        if !is_weekend(current) {
            remaining -= 1;
        }
    }
    current
}

/// Returns the first calendar day of a month.
///
/// `month_index` is 0-based (0 = January). Fails with
/// [`EngineError::InvalidInput`] when the month index is above 11 or the year
/// is outside the supported date range.
pub fn first_day_of_month(year: i32, month_index: u32) -> EngineResult<NaiveDate> {
    if month_index > 11 {
        return Err(EngineError::invalid_input(
            "month_index",
            format!("must be between 0 and 11, got {}", month_index),
        ));
    }

    NaiveDate::from_ymd_opt(year, month_index + 1, 1).ok_or_else(|| {
        EngineError::invalid_input("year", format!("{} is outside the supported range", year))
    })
}

/// Returns the last calendar day of a month (`month_index` is 0-based).
pub fn last_day_of_month(year: i32, month_index: u32) -> EngineResult<NaiveDate> {
    first_day_of_month(year, month_index)?
        .checked_add_months(Months::new(1))
        .and_then(|first_of_next| first_of_next.pred_opt())
        .ok_or_else(|| {
            EngineError::invalid_input("year", format!("{} is outside the supported range", year))
        })
}

/// Returns the last business day of a month (`month_index` is 0-based).
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::last_business_day_of_month;
/// use chrono::NaiveDate;
///
/// // August 2025 ends on a Sunday
/// let last = last_business_day_of_month(2025, 7).unwrap();
/// assert_eq!(last, NaiveDate::from_ymd_opt(2025, 8, 29).unwrap());
/// ```
pub fn last_business_day_of_month(year: i32, month_index: u32) -> EngineResult<NaiveDate> {
    last_day_of_month(year, month_index).map(previous_business_day)
}

/// Counts the weekdays in the inclusive range `start..=end`.
///
/// Returns 0 when `end` is before `start`.
pub fn count_weekdays(start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        return 0;
    }

    let mut count = 0;
    for date in start.iter_days() {
        if date > end {
            break;
        }
        if !is_weekend(date) {
            count += 1;
        }
    }
    count
}
