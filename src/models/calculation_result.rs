//! Cost breakdown models.
//!
//! This module contains the [`CalculationResult`] type produced by the cost
//! calculator, the per-contribution [`ContributionLine`] rows it carries, and
//! the derived [`MonthlyBreakdown`] and [`ConfigurationAnomaly`] views.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{round_money, round_rate};

/// One row of a cost breakdown: a single contribution on one side of payroll.
///
/// # Example
///
/// ```
/// use payroll_engine::models::ContributionLine;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let line = ContributionLine {
///     code: "pension".to_string(),
///     label: "Pension insurance".to_string(),
///     amount: Decimal::from_str("5580.00").unwrap(),
///     rate: Decimal::from_str("0.093").unwrap(),
/// };
/// assert_eq!(line.code, "pension");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionLine {
    /// The contribution code from the country rule.
    pub code: String,
    /// The contribution display name.
    pub label: String,
    /// Gross salary multiplied by `rate`.
    pub amount: Decimal,
    /// The rate that was applied.
    pub rate: Decimal,
}

/// The full employer/employee cost breakdown for one gross salary.
///
/// Produced fresh on every call. The following always hold:
///
/// - `employee_total = Σ employee_deductions.amount + income_tax_estimate`
/// - `net_salary_estimate = gross_annual - employee_total`
/// - `employer_total = Σ employer_contribs.amount`
/// - `total_employer_cost = gross_annual + employer_total`
/// - `employer_burden_pct = employer_total / gross_annual`
///
/// Amounts are kept at full precision. Use [`CalculationResult::rounded`] for
/// the two-decimal display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Country code of the rule that produced this result.
    pub country_code: String,
    /// Currency code of every amount.
    pub currency: String,
    /// The gross annual salary the calculation was based on.
    pub gross_annual: Decimal,
    /// Employee-side contributions in catalog order.
    pub employee_deductions: Vec<ContributionLine>,
    /// Income tax figure from the country's tax model.
    pub income_tax_estimate: Decimal,
    /// Everything deducted from gross on the employee side.
    pub employee_total: Decimal,
    /// What remains of gross after employee deductions and tax.
    pub net_salary_estimate: Decimal,
    /// Employer-side contributions in catalog order.
    pub employer_contribs: Vec<ContributionLine>,
    /// Sum of employer contributions.
    pub employer_total: Decimal,
    /// Gross plus employer contributions.
    pub total_employer_cost: Decimal,
    /// Employer contributions as a fraction of gross (0.2 means 20%).
    pub employer_burden_pct: Decimal,
}

/// Annual figures of a [`CalculationResult`] spread over twelve months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    /// Monthly gross salary.
    pub gross: Decimal,
    /// Monthly employee deductions including tax.
    pub employee_total: Decimal,
    /// Monthly net salary estimate.
    pub net_salary_estimate: Decimal,
    /// Monthly employer contributions.
    pub employer_total: Decimal,
    /// Monthly total cost to the employer.
    pub total_employer_cost: Decimal,
}

/// Signals a rule whose deductions exceed the gross salary.
///
/// This is not an error: the result is still returned unchanged so that bad
/// catalog data stays visible to tests and operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationAnomaly {
    /// The rule that produced the anomaly.
    pub country_code: String,
    /// Gross salary of the calculation.
    pub gross_annual: Decimal,
    /// Employee deductions including tax.
    pub employee_total: Decimal,
    /// The negative net figure.
    pub net_salary_estimate: Decimal,
}

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

impl CalculationResult {
    /// Returns the two-decimal display form of this result.
    ///
    /// Each line amount, the gross and the tax estimate are rounded half away
    /// from zero, then the totals are recomputed from the rounded figures so the
    /// documented invariants still hold exactly. The burden fraction is rounded
    /// to four decimal places.
    pub fn rounded(&self) -> CalculationResult {
        let round_lines = |lines: &[ContributionLine]| -> Vec<ContributionLine> {
            lines
                .iter()
                .map(|line| ContributionLine {
                    amount: round_money(line.amount),
                    ..line.clone()
                })
                .collect()
        };

        let gross_annual = round_money(self.gross_annual);
        let employee_deductions = round_lines(&self.employee_deductions);
        let employer_contribs = round_lines(&self.employer_contribs);
        let income_tax_estimate = round_money(self.income_tax_estimate);

        let employee_total = employee_deductions
            .iter()
            .map(|line| line.amount)
            .sum::<Decimal>()
            + income_tax_estimate;
        let employer_total: Decimal = employer_contribs.iter().map(|line| line.amount).sum();

        CalculationResult {
            country_code: self.country_code.clone(),
            currency: self.currency.clone(),
            gross_annual,
            employee_deductions,
            income_tax_estimate,
            employee_total,
            net_salary_estimate: gross_annual - employee_total,
            employer_contribs,
            employer_total,
            total_employer_cost: gross_annual + employer_total,
            employer_burden_pct: round_rate(self.employer_burden_pct),
        }
    }

    /// Spreads the annual figures evenly over twelve months.
    ///
    /// Values keep full precision; round them for display as needed.
    pub fn monthly(&self) -> MonthlyBreakdown {
        MonthlyBreakdown {
            gross: self.gross_annual / MONTHS_PER_YEAR,
            employee_total: self.employee_total / MONTHS_PER_YEAR,
            net_salary_estimate: self.net_salary_estimate / MONTHS_PER_YEAR,
            employer_total: self.employer_total / MONTHS_PER_YEAR,
            total_employer_cost: self.total_employer_cost / MONTHS_PER_YEAR,
        }
    }

    /// Returns the anomaly report when the net salary estimate is negative.
    pub fn configuration_anomaly(&self) -> Option<ConfigurationAnomaly> {
        if self.net_salary_estimate < Decimal::ZERO {
            Some(ConfigurationAnomaly {
                country_code: self.country_code.clone(),
                gross_annual: self.gross_annual,
                employee_total: self.employee_total,
                net_salary_estimate: self.net_salary_estimate,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    /// Helper function to create Decimal values from strings
    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn line(code: &str, amount: &str, rate: &str) -> ContributionLine {
        ContributionLine {
            code: code.to_string(),
            label: code.to_string(),
            amount: dec(amount),
            rate: dec(rate),
        }
    }

    fn sample_result() -> CalculationResult {
        // gross 1000.005 with a 3-decimal employee line and 4-decimal tax
        CalculationResult {
            country_code: "XX".to_string(),
            currency: "EUR".to_string(),
            gross_annual: dec("1000.005"),
            employee_deductions: vec![line("a", "100.0005", "0.1"), line("b", "50.0025", "0.05")],
            income_tax_estimate: dec("10.1249"),
            employee_total: dec("160.1279"),
            net_salary_estimate: dec("839.8771"),
            employer_contribs: vec![line("a", "200.001", "0.2")],
            employer_total: dec("200.001"),
            total_employer_cost: dec("1200.006"),
            employer_burden_pct: dec("0.19999960000199999"),
        }
    }

    /// CR-001: rounded view rounds each line half away from zero
    #[test]
    fn test_rounded_rounds_lines_half_away_from_zero() {
        let rounded = sample_result().rounded();

        assert_eq!(rounded.gross_annual, dec("1000.01"));
        assert_eq!(rounded.employee_deductions[0].amount, dec("100.00"));
        assert_eq!(rounded.employee_deductions[1].amount, dec("50.00"));
        assert_eq!(rounded.income_tax_estimate, dec("10.12"));
        assert_eq!(rounded.employer_contribs[0].amount, dec("200.00"));
        assert_eq!(rounded.employer_burden_pct, dec("0.2000"));
    }

    /// CR-002: rounded totals are rebuilt from rounded lines
    #[test]
    fn test_rounded_totals_keep_invariants() {
        let rounded = sample_result().rounded();

        let deductions: Decimal = rounded.employee_deductions.iter().map(|l| l.amount).sum();
        assert_eq!(
            rounded.employee_total,
            deductions + rounded.income_tax_estimate
        );
        assert_eq!(
            rounded.net_salary_estimate,
            rounded.gross_annual - rounded.employee_total
        );
        assert_eq!(
            rounded.total_employer_cost,
            rounded.gross_annual + rounded.employer_total
        );
        assert_eq!(rounded.employee_total, dec("160.12"));
        assert_eq!(rounded.net_salary_estimate, dec("839.89"));
    }

    #[test]
    fn test_rounded_keeps_codes_and_rates() {
        let rounded = sample_result().rounded();
        assert_eq!(rounded.employee_deductions[1].code, "b");
        assert_eq!(rounded.employee_deductions[1].rate, dec("0.05"));
        assert_eq!(rounded.currency, "EUR");
    }

    #[test]
    fn test_monthly_divides_by_twelve() {
        let mut result = sample_result();
        result.gross_annual = dec("60000");
        result.employee_total = dec("12000");
        result.net_salary_estimate = dec("48000");
        result.employer_total = dec("12600");
        result.total_employer_cost = dec("72600");

        let monthly = result.monthly();
        assert_eq!(monthly.gross, dec("5000"));
        assert_eq!(monthly.employee_total, dec("1000"));
        assert_eq!(monthly.net_salary_estimate, dec("4000"));
        assert_eq!(monthly.employer_total, dec("1050"));
        assert_eq!(monthly.total_employer_cost, dec("6050"));
    }

    /// CR-003: negative net is reported as an anomaly
    #[test]
    fn test_negative_net_is_reported_as_anomaly() {
        let mut result = sample_result();
        result.employee_total = dec("1200");
        result.net_salary_estimate = dec("-199.995");

        let anomaly = result.configuration_anomaly().unwrap();
        assert_eq!(anomaly.country_code, "XX");
        assert_eq!(anomaly.net_salary_estimate, dec("-199.995"));
    }

    #[test]
    fn test_zero_or_positive_net_is_not_an_anomaly() {
        let mut result = sample_result();
        assert!(result.configuration_anomaly().is_none());

        result.net_salary_estimate = Decimal::ZERO;
        assert!(result.configuration_anomaly().is_none());
    }

    #[test]
    fn test_calculation_result_serialization() {
        let json = serde_json::to_string(&sample_result()).unwrap();
        assert!(json.contains("\"currency\":\"EUR\""));
        assert!(json.contains("\"gross_annual\":\"1000.005\""));
        assert!(json.contains("\"employee_deductions\":[{\"code\":\"a\""));
        assert!(json.contains("\"employer_burden_pct\""));

        let deserialized: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, sample_result());
    }
}
