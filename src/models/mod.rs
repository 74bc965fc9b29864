//! Core data models for the payroll computation engine.
//!
//! Every type here is a value object: no identity beyond its fields and no
//! lifecycle beyond the calculation that produced it.

mod calculation_result;
mod country_rule;
mod payment_event;
mod proration;

pub use calculation_result::{
    CalculationResult, ConfigurationAnomaly, ContributionLine, MonthlyBreakdown,
};
pub use country_rule::{ContributionItem, CountryRule, IncomeTaxModel, TaxBase, TaxBracket};
pub use payment_event::{PaymentEvent, PaymentEventType};
pub use proration::ProrationResult;
