//! Payroll computation engine.
//!
//! This crate estimates the annual cost of employing someone in a given
//! country, builds the monthly contractor payment schedule on a Monday to
//! Friday business-day calendar, and prorates monthly compensation for a
//! partial first month.
//!
//! Country contribution rules live in a YAML catalog (see [`config`]). All
//! calculations are pure functions over [`rust_decimal::Decimal`] amounts and
//! [`chrono::NaiveDate`] dates.
//!
//! # Example
//!
//! ```
//! use payroll_engine::calculation::{build_events, calculate_costs};
//! use payroll_engine::config::RuleCatalog;
//! use rust_decimal::Decimal;
//!
//! let catalog = RuleCatalog::builtin()?;
//! let result = calculate_costs(catalog.find_rule("PL")?, Decimal::new(120000, 0))?;
//! assert_eq!(result.currency, "PLN");
//!
//! let events = build_events(2025, 1)?;
//! assert_eq!(events.len(), 4);
//! # Ok::<(), payroll_engine::error::EngineError>(())
//! ```

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
