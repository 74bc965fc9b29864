//! Country rule catalog loading and lookup.
//!
//! This module loads per-country contribution rules from YAML, validates them
//! and answers lookups by country code. A default catalog is compiled into the
//! crate from `config/countries.yaml`.
//!
//! # Example
//!
//! ```
//! use payroll_engine::config::RuleCatalog;
//!
//! let catalog = RuleCatalog::builtin().unwrap();
//! let germany = catalog.find_rule("DE").unwrap();
//! assert_eq!(germany.currency, "EUR");
//! ```

mod catalog;
mod types;

pub use catalog::{BUILTIN_CATALOG_SOURCE, RuleCatalog};
pub use types::CatalogFile;
