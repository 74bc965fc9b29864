//! Country contribution rule models.
//!
//! This module contains the [`CountryRule`] type and the pieces it is built
//! from: the per-category [`ContributionItem`]s and the [`IncomeTaxModel`]
//! that selects how income tax is estimated for the country.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One social-contribution category for a country.
///
/// Rates are fractions of gross salary in `[0, 1]`, one for the employee side
/// (deducted from pay) and one for the employer side (paid on top of gross).
///
/// # Example
///
/// ```
/// use payroll_engine::models::ContributionItem;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let pension = ContributionItem {
///     code: "pension".to_string(),
///     label: "Pension insurance".to_string(),
///     rate_employee: Decimal::from_str("0.093").unwrap(),
///     rate_employer: Decimal::from_str("0.093").unwrap(),
///     notes: None,
/// };
/// assert_eq!(pension.rate_employee, pension.rate_employer);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionItem {
    /// Stable identifier, unique within its country rule.
    pub code: String,
    /// Display name.
    pub label: String,
    /// Employee-side rate as a fraction of gross.
    pub rate_employee: Decimal,
    /// Employer-side rate as a fraction of gross.
    pub rate_employer: Decimal,
    /// Optional free-text remarks (caps, simplifications).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The amount an income tax rate is applied to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxBase {
    /// The full gross salary.
    #[default]
    Gross,
    /// Gross salary minus the employee-side contributions, floored at zero.
    AfterEmployeeContributions,
}

/// One band of a progressive schedule.
///
/// The rate applies to the part of the taxable base above `threshold` and
/// below the next bracket's threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lower bound of the band.
    pub threshold: Decimal,
    /// Marginal rate within the band, as a fraction.
    pub rate: Decimal,
}

/// Selects the income tax strategy of a country.
///
/// The calculator dispatches on this enum exhaustively. The model only decides
/// how the tax figure is produced; it never changes how the totals are
/// aggregated.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{IncomeTaxModel, TaxBase};
/// use rust_decimal::Decimal;
///
/// let model = IncomeTaxModel::Flat {
///     rate: Decimal::new(12, 2),
///     base: TaxBase::AfterEmployeeContributions,
/// };
/// assert_eq!(model.kind(), "flat");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IncomeTaxModel {
    /// A single rate applied to the configured base.
    Flat {
        /// Tax rate as a fraction.
        rate: Decimal,
        /// What the rate is applied to.
        #[serde(default)]
        base: TaxBase,
    },
    /// Cumulative bracket computation over ordered (threshold, rate) pairs.
    Progressive {
        /// Brackets ordered by ascending threshold.
        brackets: Vec<TaxBracket>,
        /// What the brackets are applied to.
        #[serde(default)]
        base: TaxBase,
    },
    /// A country-specific approximation provided by a registered estimator.
    ///
    /// Estimates are indicative only.
    Estimate {
        /// Identifier of the estimator in the tax estimator registry.
        heuristic_id: String,
    },
}

impl IncomeTaxModel {
    /// Returns the wire name of the model variant.
    pub fn kind(&self) -> &'static str {
        match self {
            IncomeTaxModel::Flat { .. } => "flat",
            IncomeTaxModel::Progressive { .. } => "progressive",
            IncomeTaxModel::Estimate { .. } => "estimate",
        }
    }
}

/// The contribution schedule and tax model of one country.
///
/// Rules are immutable once the catalog is loaded. The catalog guarantees that
/// `contributions` is non-empty, that codes are unique within the rule and
/// that every rate lies in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRule {
    /// Short country code, unique within the catalog (e.g. "DE").
    pub country_code: String,
    /// Human-readable country name.
    pub country_name: String,
    /// Currency code that amounts are expressed in (e.g. "EUR").
    pub currency: String,
    /// Income tax strategy for the country.
    pub income_tax_model: IncomeTaxModel,
    /// Contribution categories in display order.
    pub contributions: Vec<ContributionItem>,
}

impl CountryRule {
    /// Sum of the employee-side rates of all contributions.
    pub fn employee_rate_total(&self) -> Decimal {
        self.contributions.iter().map(|c| c.rate_employee).sum()
    }

    /// Sum of the employer-side rates of all contributions.
    pub fn employer_rate_total(&self) -> Decimal {
        self.contributions.iter().map(|c| c.rate_employer).sum()
    }
}
