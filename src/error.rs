//! Error types for the payroll computation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading the country catalog
//! or running one of the calculators.

use thiserror::Error;

/// The main error type for the payroll computation engine.
///
/// Every fallible operation in the crate returns this error type. Errors are
/// raised synchronously at the offending call and no operation produces a
/// partial result.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::CountryNotFound {
///     code: "XX".to_string(),
/// };
/// assert_eq!(error.to_string(), "Country not found in catalog: XX");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Catalog file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Catalog file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path (or source name) of the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The catalog parsed but one of its rules breaks a catalog invariant.
    #[error("Invalid catalog entry '{country_code}': {message}")]
    InvalidCatalog {
        /// The country code of the offending rule.
        country_code: String,
        /// A description of the violated invariant.
        message: String,
    },

    /// Country code was not found in the catalog.
    #[error("Country not found in catalog: {code}")]
    CountryNotFound {
        /// The country code that was requested.
        code: String,
    },

    /// An `estimate` tax model named a heuristic that is not registered.
    #[error("Tax heuristic not registered: {heuristic_id}")]
    TaxHeuristicNotFound {
        /// The heuristic identifier that was requested.
        heuristic_id: String,
    },

    /// A calculator argument was missing, negative, non-finite or out of range.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The name of the offending argument.
        field: String,
        /// A description of what made the argument invalid.
        message: String,
    },

    /// The gross salary was zero, so the employer burden cannot be computed.
    #[error("Gross salary must be greater than zero to compute employer burden")]
    ZeroGrossSalary,

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for building an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
