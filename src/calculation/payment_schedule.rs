//! Contractor payment milestone generation.
//!
//! Each month carries four milestones, computed independently of every other
//! month:
//!
//! 1. Invoice due: the 20th, moved back to the previous business day when it
//!    falls on a weekend.
//! 2. Pre-funding sent: two business days after the invoice due date.
//! 3. Contractor payment: the last business day of the month.
//! 4. Pre-funding due: three calendar days before the payment date, moved back
//!    to the previous business day when it falls on a weekend.
//!
//! Pre-funding due is anchored to the payment date in calendar days, while
//! pre-funding sent is anchored to the invoice date in business days. The two
//! dates can therefore land in either order.

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{PaymentEvent, PaymentEventType};

use super::business_days::{
    add_business_days, first_day_of_month, last_business_day_of_month, previous_business_day,
};

/// Calendar day of the month on which contractor invoices are due.
pub const INVOICE_DUE_DAY: u32 = 20;

/// Business days between the invoice due date and pre-funding being sent.
pub const PREFUNDING_SENT_BUSINESS_DAYS: u32 = 2;

/// Calendar days between pre-funding being due and the payment date.
pub const PREFUNDING_DUE_CALENDAR_DAYS: u64 = 3;

/// Builds the four payment milestones for a month.
///
/// `month_index` is 0-based (0 = January). Events are returned in the order
/// invoice, prefunding-sent, prefunding-due, payment. That order is not always
/// date-ascending; callers that need date order sort explicitly.
///
/// # Returns
///
/// Exactly four events for any `month_index` in `0..=11`, or `InvalidInput`
/// when the month index or year is out of range.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::build_events;
/// use payroll_engine::models::PaymentEventType;
/// use chrono::NaiveDate;
///
/// // February 2025
/// let events = build_events(2025, 1).unwrap();
/// assert_eq!(events.len(), 4);
/// assert_eq!(events[0].event_type, PaymentEventType::Invoice);
/// assert_eq!(events[0].date, NaiveDate::from_ymd_opt(2025, 2, 20).unwrap());
/// assert_eq!(events[3].date, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
/// ```
pub fn build_events(year: i32, month_index: u32) -> EngineResult<Vec<PaymentEvent>> {
    let invoice_due = invoice_due_date(year, month_index)?;
    let prefunding_sent = add_business_days(invoice_due, PREFUNDING_SENT_BUSINESS_DAYS);
    let payment = last_business_day_of_month(year, month_index)?;
    let prefunding_due = prefunding_due_date(payment)?;

    debug!(
        year,
        month_index,
        invoice_due = %invoice_due,
        prefunding_sent = %prefunding_sent,
        prefunding_due = %prefunding_due,
        payment = %payment,
        "Payment schedule built"
    );

    Ok(vec![
        PaymentEvent {
            event_type: PaymentEventType::Invoice,
            date: invoice_due,
            label: "Invoice due".to_string(),
            description: "Contractors submit their invoices for the month by this date."
                .to_string(),
        },
        PaymentEvent {
            event_type: PaymentEventType::PrefundingSent,
            date: prefunding_sent,
            label: "Pre-funding sent".to_string(),
            description: "Send the pre-funding transfer covering approved invoices.".to_string(),
        },
        PaymentEvent {
            event_type: PaymentEventType::PrefundingDue,
            date: prefunding_due,
            label: "Pre-funding due".to_string(),
            description: "Pre-funding must be received so payments can be released on time."
                .to_string(),
        },
        PaymentEvent {
            event_type: PaymentEventType::Payment,
            date: payment,
            label: "Contractor payment".to_string(),
            description: "Contractors are paid on the last business day of the month."
                .to_string(),
        },
    ])
}

/// The 20th of the month, or the business day before it.
fn invoice_due_date(year: i32, month_index: u32) -> EngineResult<NaiveDate> {
    let twentieth = first_day_of_month(year, month_index)?
        .checked_add_days(Days::new(u64::from(INVOICE_DUE_DAY - 1)))
        .ok_or_else(|| {
            EngineError::invalid_input("year", format!("{} is outside the supported range", year))
        })?;
    Ok(previous_business_day(twentieth))
}

/// Three calendar days before `payment`, or the business day before that.
fn prefunding_due_date(payment: NaiveDate) -> EngineResult<NaiveDate> {
    payment
        .checked_sub_days(Days::new(PREFUNDING_DUE_CALENDAR_DAYS))
        .map(previous_business_day)
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("cannot step back from payment date {}", payment),
        })
}
