//! Income tax strategies.
//!
//! This module evaluates a country's [`IncomeTaxModel`]. Flat and progressive
//! models are computed directly from their parameters. The `estimate` model
//! looks up a [`TaxEstimator`] by identifier in a [`TaxEstimators`] registry,
//! so new country heuristics can be plugged in without touching the cost
//! calculator.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{IncomeTaxModel, TaxBase, TaxBracket};

/// Identifier of the built-in German income tax approximation.
pub const DE_INCOME_TAX: &str = "de_income_tax";
/// Identifier of the built-in French income tax approximation.
pub const FR_INCOME_TAX: &str = "fr_income_tax";
/// Identifier of the built-in UK income tax approximation.
pub const GB_INCOME_TAX: &str = "gb_income_tax";

/// A country-specific income tax heuristic.
///
/// Implementations must be deterministic and must return a non-negative value.
/// The calculator rejects negative estimates with
/// [`EngineError::CalculationError`]. An estimate that cannot be represented
/// should be reported as an error rather than a panic.
pub trait TaxEstimator: Debug + Send + Sync {
    /// Estimates annual income tax.
    ///
    /// `employee_contributions` is the sum of the employee-side contribution
    /// amounts for the same gross salary.
    fn estimate(
        &self,
        gross_annual: Decimal,
        employee_contributions: Decimal,
    ) -> EngineResult<Decimal>;
}

/// A banded approximation: deductions first, then progressive bands.
///
/// The taxable amount is gross, optionally minus employee contributions, minus
/// a flat expense deduction (a fraction of what remains), minus a personal
/// allowance, floored at zero. The bands are then applied cumulatively.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{BandedEstimate, TaxEstimator};
/// use payroll_engine::models::TaxBracket;
/// use rust_decimal::Decimal;
///
/// let estimator = BandedEstimate {
///     allowance: Decimal::new(10000, 0),
///     expense_deduction_rate: Decimal::ZERO,
///     deduct_contributions: false,
///     bands: vec![TaxBracket { threshold: Decimal::ZERO, rate: Decimal::new(20, 2) }],
/// };
/// let tax = estimator.estimate(Decimal::new(30000, 0), Decimal::ZERO).unwrap();
/// assert_eq!(tax, Decimal::new(4000, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandedEstimate {
    /// Tax-free amount subtracted before the bands apply.
    pub allowance: Decimal,
    /// Fraction of income deducted as flat professional expenses.
    pub expense_deduction_rate: Decimal,
    /// Whether employee contributions reduce the taxable amount.
    pub deduct_contributions: bool,
    /// Progressive bands over the taxable amount.
    pub bands: Vec<TaxBracket>,
}

impl TaxEstimator for BandedEstimate {
    fn estimate(
        &self,
        gross_annual: Decimal,
        employee_contributions: Decimal,
    ) -> EngineResult<Decimal> {
        let mut taxable = gross_annual;
        if self.deduct_contributions {
            taxable = taxable
                .checked_sub(employee_contributions)
                .ok_or_else(|| overflow("taxable income"))?;
        }
        let expenses = taxable
            .checked_mul(self.expense_deduction_rate)
            .ok_or_else(|| overflow("expense deduction"))?;
        taxable = taxable
            .checked_sub(expenses)
            .and_then(|remaining| remaining.checked_sub(self.allowance))
            .ok_or_else(|| overflow("taxable income"))?;

        progressive_tax(&self.bands, taxable.max(Decimal::ZERO))
    }
}

fn bracket(threshold: i64, rate_percent: i64) -> TaxBracket {
    TaxBracket {
        threshold: Decimal::new(threshold, 0),
        rate: Decimal::new(rate_percent, 2),
    }
}

/// Germany: basic allowance, then a stepped stand-in for the linear zones.
fn german_estimate() -> BandedEstimate {
    BandedEstimate {
        allowance: Decimal::new(12096, 0),
        expense_deduction_rate: Decimal::ZERO,
        deduct_contributions: true,
        bands: vec![
            bracket(0, 19),
            bracket(5347, 33),
            bracket(56384, 42),
            bracket(265729, 45),
        ],
    }
}

/// France: 10% professional expense deduction, then the barème bands.
fn french_estimate() -> BandedEstimate {
    BandedEstimate {
        allowance: Decimal::ZERO,
        expense_deduction_rate: Decimal::new(10, 2),
        deduct_contributions: true,
        bands: vec![
            bracket(0, 0),
            bracket(11497, 11),
            bracket(29315, 30),
            bracket(83823, 41),
            bracket(180294, 45),
        ],
    }
}

/// United Kingdom: personal allowance, then basic/higher/additional rates.
fn uk_estimate() -> BandedEstimate {
    BandedEstimate {
        allowance: Decimal::new(12570, 0),
        expense_deduction_rate: Decimal::ZERO,
        deduct_contributions: false,
        bands: vec![bracket(0, 20), bracket(37700, 40), bracket(112570, 45)],
    }
}

/// Registry of tax estimators keyed by heuristic identifier.
///
/// Estimators are shared behind [`Arc`], so a registry is cheap to clone and
/// can be used from several threads at once.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{BandedEstimate, TaxEstimators};
/// use rust_decimal::Decimal;
///
/// let mut estimators = TaxEstimators::with_defaults();
/// estimators.register("zero_tax", BandedEstimate {
///     allowance: Decimal::ZERO,
///     expense_deduction_rate: Decimal::ZERO,
///     deduct_contributions: false,
///     bands: vec![],
/// });
/// assert!(estimators.contains("zero_tax"));
/// assert!(estimators.contains("gb_income_tax"));
/// ```
#[derive(Debug, Clone)]
pub struct TaxEstimators {
    estimators: HashMap<String, Arc<dyn TaxEstimator>>,
}

impl TaxEstimators {
    /// Creates a registry with no estimators registered.
    ///
    /// [`TaxEstimators::default`] is the same as
    /// [`TaxEstimators::with_defaults`], not an empty registry.
    pub fn empty() -> Self {
        Self {
            estimators: HashMap::new(),
        }
    }

    /// Creates a registry holding the built-in country heuristics.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(DE_INCOME_TAX, german_estimate());
        registry.register(FR_INCOME_TAX, french_estimate());
        registry.register(GB_INCOME_TAX, uk_estimate());
        registry
    }

    /// Registers an estimator, replacing any previous one with the same id.
    pub fn register<E>(&mut self, heuristic_id: impl Into<String>, estimator: E) -> &mut Self
    where
        E: TaxEstimator + 'static,
    {
        self.estimators
            .insert(heuristic_id.into(), Arc::new(estimator));
        self
    }

    /// Returns true if an estimator is registered under `heuristic_id`.
    pub fn contains(&self, heuristic_id: &str) -> bool {
        self.estimators.contains_key(heuristic_id)
    }

    /// Returns the registered identifiers in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.estimators.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Looks up an estimator, failing with `TaxHeuristicNotFound`.
    pub fn get(&self, heuristic_id: &str) -> EngineResult<&dyn TaxEstimator> {
        self.estimators
            .get(heuristic_id)
            .map(|estimator| estimator.as_ref())
            .ok_or_else(|| EngineError::TaxHeuristicNotFound {
                heuristic_id: heuristic_id.to_string(),
            })
    }
}

impl Default for TaxEstimators {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Applies ordered brackets cumulatively to `base`.
///
/// Each bracket taxes the part of `base` between its own threshold and the
/// next bracket's threshold. Amounts below the first threshold are untaxed.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::progressive_tax;
/// use payroll_engine::models::TaxBracket;
/// use rust_decimal::Decimal;
///
/// let brackets = vec![
///     TaxBracket { threshold: Decimal::ZERO, rate: Decimal::new(10, 2) },
///     TaxBracket { threshold: Decimal::new(10000, 0), rate: Decimal::new(20, 2) },
/// ];
/// // 10000 at 10% + 5000 at 20%
/// assert_eq!(progressive_tax(&brackets, Decimal::new(15000, 0)).unwrap(), Decimal::new(2000, 0));
/// ```
///
/// Fails with `CalculationError` when the tax overflows `Decimal`, which only
/// happens for rates above 1 or amounts near `Decimal::MAX`.
pub fn progressive_tax(brackets: &[TaxBracket], base: Decimal) -> EngineResult<Decimal> {
    let mut tax = Decimal::ZERO;

    for (index, current) in brackets.iter().enumerate() {
        if base <= current.threshold {
            break;
        }
        let upper = match brackets.get(index + 1) {
            Some(next) => next.threshold.min(base),
            None => base,
        };
        if upper > current.threshold {
            tax = (upper - current.threshold)
                .checked_mul(current.rate)
                .and_then(|band_tax| tax.checked_add(band_tax))
                .ok_or_else(|| overflow("progressive tax"))?;
        }
    }

    Ok(tax)
}

fn overflow(what: &str) -> EngineError {
    EngineError::CalculationError {
        message: format!("{} overflowed the supported decimal range", what),
    }
}

/// Resolves a [`TaxBase`] to an amount.
pub fn taxable_base(base: TaxBase, gross_annual: Decimal, employee_contributions: Decimal) -> Decimal {
    match base {
        TaxBase::Gross => gross_annual,
        TaxBase::AfterEmployeeContributions => {
            (gross_annual - employee_contributions).max(Decimal::ZERO)
        }
    }
}

/// Computes the income tax figure for a model.
///
/// Fails with `TaxHeuristicNotFound` for an unregistered estimate id and with
/// `CalculationError` when an estimator returns a negative value or the tax
/// overflows.
pub fn compute_income_tax(
    model: &IncomeTaxModel,
    gross_annual: Decimal,
    employee_contributions: Decimal,
    estimators: &TaxEstimators,
) -> EngineResult<Decimal> {
    match model {
        IncomeTaxModel::Flat { rate, base } => {
            taxable_base(*base, gross_annual, employee_contributions)
                .checked_mul(*rate)
                .ok_or_else(|| overflow("flat tax"))
        }
        IncomeTaxModel::Progressive { brackets, base } => progressive_tax(
            brackets,
            taxable_base(*base, gross_annual, employee_contributions),
        ),
        IncomeTaxModel::Estimate { heuristic_id } => {
            let estimate = estimators
                .get(heuristic_id)?
                .estimate(gross_annual, employee_contributions)?;
            if estimate < Decimal::ZERO {
                return Err(EngineError::CalculationError {
                    message: format!(
                        "tax heuristic '{}' returned a negative estimate: {}",
                        heuristic_id, estimate
                    ),
                });
            }
            Ok(estimate)
        }
    }
}
