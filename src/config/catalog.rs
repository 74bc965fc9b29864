//! The [`RuleCatalog`] type: loading, validation and lookup of country rules.

use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{CountryRule, IncomeTaxModel, TaxBracket};

use super::types::CatalogFile;

/// Source name reported for the compiled-in catalog.
pub const BUILTIN_CATALOG_SOURCE: &str = "builtin:countries.yaml";

const BUILTIN_CATALOG: &str = include_str!("../../config/countries.yaml");

/// Country code used in `InvalidCatalog` errors that concern the whole catalog.
const CATALOG_SCOPE: &str = "*";

/// A validated, read-only set of country rules.
///
/// Rules keep their declaration order. Every constructor validates the rules
/// before returning, so a `RuleCatalog` never holds an empty contribution list,
/// a duplicate country or a rate outside `[0, 1]`.
///
/// # Example
///
/// ```
/// use payroll_engine::config::RuleCatalog;
///
/// let catalog = RuleCatalog::builtin()?;
/// assert!(catalog.country_codes().contains(&"FR"));
///
/// let spain = catalog.find_rule(" es ")?;
/// assert_eq!(spain.country_name, "Spain");
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RuleCatalog {
    rules: Vec<CountryRule>,
}

impl RuleCatalog {
    /// Loads the catalog compiled into the crate.
    pub fn builtin() -> EngineResult<Self> {
        Self::from_yaml_str(BUILTIN_CATALOG_SOURCE, BUILTIN_CATALOG)
    }

    /// Loads a catalog from a YAML file.
    ///
    /// # Returns
    ///
    /// Returns the catalog on success, or an error if:
    /// - the file cannot be read (`ConfigNotFound`)
    /// - the file is not a valid catalog document (`ConfigParseError`)
    /// - a rule breaks a catalog invariant (`InvalidCatalog`)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::RuleCatalog;
    ///
    /// let catalog = RuleCatalog::load("./config/countries.yaml")?;
    /// println!("Loaded {} countries", catalog.len());
    /// # Ok::<(), payroll_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml_str(&path_str, &content)
    }

    /// Parses catalog YAML. `source` names the document in errors and logs.
    pub fn from_yaml_str(source: &str, content: &str) -> EngineResult<Self> {
        let file: CatalogFile =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: source.to_string(),
                message: e.to_string(),
            })?;

        let catalog = Self::from_rules(file.countries)?;

        info!(
            source,
            country_count = catalog.len(),
            "Rule catalog loaded"
        );

        Ok(catalog)
    }

    /// Builds a catalog from rules already in memory.
    ///
    /// Country codes are stored with surrounding whitespace removed.
    pub fn from_rules(mut rules: Vec<CountryRule>) -> EngineResult<Self> {
        for rule in &mut rules {
            rule.country_code = rule.country_code.trim().to_string();
        }
        validate_rules(&rules)?;
        Ok(Self { rules })
    }

    /// Returns every rule in declaration order.
    pub fn list_rules(&self) -> &[CountryRule] {
        &self.rules
    }

    /// Looks up a rule by country code.
    ///
    /// Matching ignores ASCII case and surrounding whitespace. An unknown code
    /// fails with `CountryNotFound`; no default country is substituted.
    pub fn find_rule(&self, country_code: &str) -> EngineResult<&CountryRule> {
        let wanted = country_code.trim();
        self.rules
            .iter()
            .find(|rule| rule.country_code.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::CountryNotFound {
                code: country_code.to_string(),
            })
    }

    /// Number of countries in the catalog.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the catalog holds no rules. Validated catalogs never do.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Country codes in declaration order.
    pub fn country_codes(&self) -> Vec<&str> {
        self.rules
            .iter()
            .map(|rule| rule.country_code.as_str())
            .collect()
    }
}

fn invalid(country_code: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidCatalog {
        country_code: country_code.to_string(),
        message: message.into(),
    }
}

fn is_fraction(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate <= Decimal::ONE
}

fn validate_rules(rules: &[CountryRule]) -> EngineResult<()> {
    if rules.is_empty() {
        return Err(invalid(CATALOG_SCOPE, "catalog contains no countries"));
    }

    let mut seen = HashSet::new();
    for rule in rules {
        let code = rule.country_code.as_str();
        if code.is_empty() {
            return Err(invalid(code, "country code is blank"));
        }
        if !seen.insert(code.to_ascii_uppercase()) {
            return Err(invalid(code, "country code is declared more than once"));
        }
        validate_rule(rule)?;
    }

    Ok(())
}

fn validate_rule(rule: &CountryRule) -> EngineResult<()> {
    let code = rule.country_code.as_str();

    if rule.contributions.is_empty() {
        return Err(invalid(code, "contribution list is empty"));
    }

    let mut seen = HashSet::new();
    for item in &rule.contributions {
        if !seen.insert(item.code.as_str()) {
            return Err(invalid(
                code,
                format!("contribution code '{}' is declared more than once", item.code),
            ));
        }
        if !is_fraction(item.rate_employee) || !is_fraction(item.rate_employer) {
            return Err(invalid(
                code,
                format!(
                    "contribution '{}' has a rate outside [0, 1] (employee {}, employer {})",
                    item.code, item.rate_employee, item.rate_employer
                ),
            ));
        }
    }

    match &rule.income_tax_model {
        IncomeTaxModel::Flat { rate, .. } => {
            if !is_fraction(*rate) {
                return Err(invalid(code, format!("flat tax rate {} is outside [0, 1]", rate)));
            }
        }
        IncomeTaxModel::Progressive { brackets, .. } => validate_brackets(code, brackets)?,
        IncomeTaxModel::Estimate { heuristic_id } => {
            if heuristic_id.trim().is_empty() {
                return Err(invalid(code, "estimate model has a blank heuristic id"));
            }
        }
    }

    Ok(())
}

fn validate_brackets(code: &str, brackets: &[TaxBracket]) -> EngineResult<()> {
    if brackets.is_empty() {
        return Err(invalid(code, "progressive model has no brackets"));
    }

    for bracket in brackets {
        if bracket.threshold < Decimal::ZERO {
            return Err(invalid(
                code,
                format!("bracket threshold {} is negative", bracket.threshold),
            ));
        }
        if !is_fraction(bracket.rate) {
            return Err(invalid(
                code,
                format!("bracket rate {} is outside [0, 1]", bracket.rate),
            ));
        }
    }

    if let Some(pair) = brackets
        .windows(2)
        .find(|pair| pair[1].threshold <= pair[0].threshold)
    {
        return Err(invalid(
            code,
            format!(
                "bracket thresholds must ascend strictly ({} is followed by {})",
                pair[0].threshold, pair[1].threshold
            ),
        ));
    }

    Ok(())
}
