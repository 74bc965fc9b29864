//! Employer and employee cost breakdowns.
//!
//! This module turns a [`CountryRule`] and a gross annual salary into a
//! [`CalculationResult`]. The calculation is pure: no I/O, no caching and no
//! state carried between calls.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{CalculationResult, ContributionItem, ContributionLine, CountryRule};

use super::income_tax::{TaxEstimators, compute_income_tax};

/// Computes cost breakdowns against a registry of tax estimators.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::CostCalculator;
/// use payroll_engine::config::RuleCatalog;
/// use rust_decimal::Decimal;
///
/// let catalog = RuleCatalog::builtin()?;
/// let rule = catalog.find_rule("de")?;
///
/// let result = CostCalculator::new().calculate(rule, Decimal::new(60000, 0))?;
/// assert_eq!(result.currency, "EUR");
/// assert!(result.total_employer_cost > Decimal::new(60000, 0));
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct CostCalculator {
    estimators: TaxEstimators,
}

impl CostCalculator {
    /// Creates a calculator with the built-in tax heuristics.
    pub fn new() -> Self {
        Self::with_estimators(TaxEstimators::with_defaults())
    }

    /// Creates a calculator with a custom estimator registry.
    pub fn with_estimators(estimators: TaxEstimators) -> Self {
        Self { estimators }
    }

    /// Returns the estimator registry used for `estimate` tax models.
    pub fn estimators(&self) -> &TaxEstimators {
        &self.estimators
    }

    /// Produces the full cost breakdown for `gross_annual` under `rule`.
    ///
    /// # Returns
    ///
    /// Returns a full-precision [`CalculationResult`], or an error if:
    /// - `gross_annual` is negative (`InvalidInput`)
    /// - `gross_annual` is zero (`ZeroGrossSalary`)
    /// - the rule's estimate heuristic is not registered (`TaxHeuristicNotFound`)
    /// - the heuristic returns a negative figure (`CalculationError`)
    /// - a line, total or tax figure would overflow `Decimal` (`InvalidInput`
    ///   naming `gross_annual`, or `CalculationError` from the tax model)
    ///
    /// A negative net salary is not an error; it is logged and can be read back
    /// through [`CalculationResult::configuration_anomaly`].
    pub fn calculate(
        &self,
        rule: &CountryRule,
        gross_annual: Decimal,
    ) -> EngineResult<CalculationResult> {
        if gross_annual < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                "gross_annual",
                format!("must not be negative, got {}", gross_annual),
            ));
        }
        if gross_annual.is_zero() {
            return Err(EngineError::ZeroGrossSalary);
        }

        let employee_deductions = contribution_lines(rule, gross_annual, |item| item.rate_employee)?;
        let employer_contribs = contribution_lines(rule, gross_annual, |item| item.rate_employer)?;

        let employee_contributions = sum_amounts(&employee_deductions, gross_annual)?;
        let income_tax_estimate = compute_income_tax(
            &rule.income_tax_model,
            gross_annual,
            employee_contributions,
            &self.estimators,
        )?;

        let employee_total = employee_contributions
            .checked_add(income_tax_estimate)
            .ok_or_else(|| too_large(gross_annual))?;
        let net_salary_estimate = gross_annual
            .checked_sub(employee_total)
            .ok_or_else(|| too_large(gross_annual))?;

        let employer_total = sum_amounts(&employer_contribs, gross_annual)?;
        let total_employer_cost = gross_annual
            .checked_add(employer_total)
            .ok_or_else(|| too_large(gross_annual))?;
        let employer_burden_pct = employer_total
            .checked_div(gross_annual)
            .ok_or_else(|| too_large(gross_annual))?;

        let result = CalculationResult {
            country_code: rule.country_code.clone(),
            currency: rule.currency.clone(),
            gross_annual,
            employee_deductions,
            income_tax_estimate,
            employee_total,
            net_salary_estimate,
            employer_contribs,
            employer_total,
            total_employer_cost,
            employer_burden_pct,
        };

        if let Some(anomaly) = result.configuration_anomaly() {
            warn!(
                country_code = %anomaly.country_code,
                gross_annual = %anomaly.gross_annual,
                employee_total = %anomaly.employee_total,
                net_salary_estimate = %anomaly.net_salary_estimate,
                "Employee deductions exceed gross salary; check the country rule"
            );
        }

        debug!(
            country_code = %rule.country_code,
            tax_model = rule.income_tax_model.kind(),
            gross_annual = %gross_annual,
            employee_total = %result.employee_total,
            employer_total = %result.employer_total,
            "Cost breakdown calculated"
        );

        Ok(result)
    }
}

/// One line per contribution item, in catalog order, at the rate `rate_of` picks.
fn contribution_lines(
    rule: &CountryRule,
    gross_annual: Decimal,
    rate_of: impl Fn(&ContributionItem) -> Decimal,
) -> EngineResult<Vec<ContributionLine>> {
    rule.contributions
        .iter()
        .map(|item| {
            let rate = rate_of(item);
            let amount = gross_annual
                .checked_mul(rate)
                .ok_or_else(|| too_large(gross_annual))?;
            Ok(ContributionLine {
                code: item.code.clone(),
                label: item.label.clone(),
                amount,
                rate,
            })
        })
        .collect()
}

fn sum_amounts(lines: &[ContributionLine], gross_annual: Decimal) -> EngineResult<Decimal> {
    lines.iter().try_fold(Decimal::ZERO, |total, line| {
        total
            .checked_add(line.amount)
            .ok_or_else(|| too_large(gross_annual))
    })
}

fn too_large(gross_annual: Decimal) -> EngineError {
    EngineError::invalid_input(
        "gross_annual",
        format!("{} is too large to produce a cost breakdown", gross_annual),
    )
}

/// Calculates a cost breakdown with the built-in tax heuristics.
///
/// Shorthand for `CostCalculator::new().calculate(rule, gross_annual)`.
pub fn calculate_costs(rule: &CountryRule, gross_annual: Decimal) -> EngineResult<CalculationResult> {
    CostCalculator::new().calculate(rule, gross_annual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{BandedEstimate, TaxEstimators, amount_from_f64};
    use crate::models::{ContributionItem, IncomeTaxModel, TaxBase, TaxBracket};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(code: &str, employee: &str, employer: &str) -> ContributionItem {
        ContributionItem {
            code: code.to_string(),
            label: format!("{} contribution", code),
            rate_employee: dec(employee),
            rate_employer: dec(employer),
            notes: None,
        }
    }

    fn create_test_rule(model: IncomeTaxModel) -> CountryRule {
        CountryRule {
            country_code: "XX".to_string(),
            country_name: "Testland".to_string(),
            currency: "EUR".to_string(),
            income_tax_model: model,
            contributions: vec![
                item("pension", "0.093", "0.093"),
                item("health", "0.073", "0.073"),
                item("accident", "0", "0.013"),
            ],
        }
    }

    fn flat(rate: &str) -> IncomeTaxModel {
        IncomeTaxModel::Flat {
            rate: dec(rate),
            base: TaxBase::Gross,
        }
    }

    // ==========================================================================
    // CC-001: contribution lines follow catalog order and rates
    // ==========================================================================
    #[test]
    fn test_cc_001_lines_follow_catalog_order() {
        let rule = create_test_rule(flat("0.2"));
        let result = CostCalculator::new().calculate(&rule, dec("60000")).unwrap();

        let codes: Vec<&str> = result
            .employee_deductions
            .iter()
            .map(|line| line.code.as_str())
            .collect();
        assert_eq!(codes, vec!["pension", "health", "accident"]);

        assert_eq!(result.employee_deductions[0].amount, dec("5580"));
        assert_eq!(result.employee_deductions[1].amount, dec("4380"));
        assert_eq!(result.employee_deductions[2].amount, Decimal::ZERO);
        assert_eq!(result.employer_contribs[2].amount, dec("780"));
        assert_eq!(result.employer_contribs[2].rate, dec("0.013"));
        assert_eq!(result.employer_contribs[2].label, "accident contribution");
    }

    // ==========================================================================
    // CC-002: totals satisfy the aggregation rules
    // ==========================================================================
    #[test]
    fn test_cc_002_totals_follow_aggregation_rules() {
        let rule = create_test_rule(flat("0.2"));
        let result = CostCalculator::new().calculate(&rule, dec("60000")).unwrap();

        assert_eq!(result.income_tax_estimate, dec("12000"));
        assert_eq!(result.employee_total, dec("21960"));
        assert_eq!(result.net_salary_estimate, dec("38040"));
        assert_eq!(result.employer_total, dec("10740"));
        assert_eq!(result.total_employer_cost, dec("70740"));
        assert_eq!(result.employer_burden_pct, dec("0.179"));
        assert_eq!(
            result.net_salary_estimate + result.employee_total,
            result.gross_annual
        );
    }

    #[test]
    fn test_result_carries_rule_identity() {
        let rule = create_test_rule(flat("0.2"));
        let result = CostCalculator::new().calculate(&rule, dec("60000")).unwrap();
        assert_eq!(result.country_code, "XX");
        assert_eq!(result.currency, "EUR");
        assert_eq!(result.gross_annual, dec("60000"));
    }

    // ==========================================================================
    // CC-003: tax models only change the tax figure
    // ==========================================================================
    #[test]
    fn test_cc_003_progressive_model() {
        let rule = create_test_rule(IncomeTaxModel::Progressive {
            brackets: vec![
                TaxBracket {
                    threshold: dec("0"),
                    rate: dec("0"),
                },
                TaxBracket {
                    threshold: dec("10000"),
                    rate: dec("0.25"),
                },
            ],
            base: TaxBase::Gross,
        });
        let result = CostCalculator::new().calculate(&rule, dec("60000")).unwrap();

        assert_eq!(result.income_tax_estimate, dec("12500"));
        assert_eq!(result.employee_total, dec("22460"));
        assert_eq!(result.employer_total, dec("10740"));
    }

    #[test]
    fn test_flat_model_after_contributions() {
        let rule = create_test_rule(IncomeTaxModel::Flat {
            rate: dec("0.1"),
            base: TaxBase::AfterEmployeeContributions,
        });
        let result = CostCalculator::new().calculate(&rule, dec("60000")).unwrap();

        // (60000 - 9960) * 0.1
        assert_eq!(result.income_tax_estimate, dec("5004"));
    }

    #[test]
    fn test_custom_estimator_is_plugged_in_without_calculator_changes() {
        let mut estimators = TaxEstimators::empty();
        estimators.register(
            "xx_income_tax",
            BandedEstimate {
                allowance: dec("10000"),
                expense_deduction_rate: Decimal::ZERO,
                deduct_contributions: false,
                bands: vec![TaxBracket {
                    threshold: Decimal::ZERO,
                    rate: dec("0.3"),
                }],
            },
        );
        let calculator = CostCalculator::with_estimators(estimators);
        let rule = create_test_rule(IncomeTaxModel::Estimate {
            heuristic_id: "xx_income_tax".to_string(),
        });

        let result = calculator.calculate(&rule, dec("60000")).unwrap();
        assert_eq!(result.income_tax_estimate, dec("15000"));
        assert_eq!(result.employee_total, dec("24960"));
    }

    #[test]
    fn test_unregistered_heuristic_fails() {
        let calculator = CostCalculator::with_estimators(TaxEstimators::empty());
        let rule = create_test_rule(IncomeTaxModel::Estimate {
            heuristic_id: "missing".to_string(),
        });

        let result = calculator.calculate(&rule, dec("60000"));
        assert!(matches!(
            result,
            Err(EngineError::TaxHeuristicNotFound { .. })
        ));
    }

    // ==========================================================================
    // CC-004: invalid gross salaries are rejected before computation
    // ==========================================================================
    #[test]
    fn test_cc_004_negative_gross_is_invalid_input() {
        let rule = create_test_rule(flat("0.2"));
        match CostCalculator::new().calculate(&rule, dec("-1")) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "gross_annual"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_gross_is_division_by_zero_class() {
        let rule = create_test_rule(flat("0.2"));
        let result = CostCalculator::new().calculate(&rule, Decimal::ZERO);
        assert!(matches!(result, Err(EngineError::ZeroGrossSalary)));
    }

    // ==========================================================================
    // CC-005: over-100% rules surface a negative net unchanged
    // ==========================================================================
    #[test]
    fn test_cc_005_negative_net_is_not_clamped() {
        let rule = create_test_rule(flat("0.95"));
        let result = CostCalculator::new().calculate(&rule, dec("10000")).unwrap();

        // contributions 1660 + tax 9500
        assert_eq!(result.employee_total, dec("11160"));
        assert_eq!(result.net_salary_estimate, dec("-1160"));

        let anomaly = result.configuration_anomaly().unwrap();
        assert_eq!(anomaly.country_code, "XX");
        assert_eq!(anomaly.employee_total, dec("11160"));
    }

    // ==========================================================================
    // CC-006: amounts beyond the decimal range fail without panicking
    // ==========================================================================
    #[test]
    fn test_cc_006_overflowing_gross_is_invalid_input() {
        let rule = create_test_rule(flat("0.2"));
        let gross = amount_from_f64("gross_annual", 7.0e28).unwrap();

        // employer cost would be 1.179 * 7e28, past Decimal::MAX
        match CostCalculator::new().calculate(&rule, gross) {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "gross_annual");
                assert!(message.contains("too large"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_decimal_max_gross_with_estimate_model_does_not_panic() {
        let rule = create_test_rule(IncomeTaxModel::Estimate {
            heuristic_id: crate::calculation::DE_INCOME_TAX.to_string(),
        });
        let result = CostCalculator::new().calculate(&rule, Decimal::MAX);
        assert!(result.is_err());
    }

    #[test]
    fn test_overflowing_rate_in_unvalidated_rule_is_an_error() {
        let mut rule = create_test_rule(flat("0"));
        rule.contributions[0].rate_employee = dec("1000000");
        let gross = dec("1000000000000000000000000");

        let result = CostCalculator::new().calculate(&rule, gross);
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_very_large_gross_within_range_still_conserves() {
        let rule = create_test_rule(flat("0.2"));
        let gross = dec("10000000000000000000000000");
        let result = CostCalculator::new().calculate(&rule, gross).unwrap();

        assert_eq!(result.net_salary_estimate + result.employee_total, gross);
        assert_eq!(result.total_employer_cost - gross, result.employer_total);
    }

    #[test]
    fn test_fractional_gross_keeps_full_precision() {
        let rule = create_test_rule(flat("0"));
        let result = CostCalculator::new().calculate(&rule, dec("33333.33")).unwrap();

        assert_eq!(result.employee_deductions[0].amount, dec("3099.99969"));
        assert_eq!(result.rounded().employee_deductions[0].amount, dec("3100.00"));
    }

    #[test]
    fn test_calculate_costs_matches_default_calculator() {
        let rule = create_test_rule(flat("0.2"));
        let direct = CostCalculator::new().calculate(&rule, dec("45000")).unwrap();
        let shorthand = calculate_costs(&rule, dec("45000")).unwrap();
        assert_eq!(direct, shorthand);
    }

    #[test]
    fn test_calculator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CostCalculator>();
    }
}
