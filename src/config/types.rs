//! On-disk shape of a rule catalog.

use serde::Deserialize;

use crate::models::CountryRule;

/// Top-level structure of a catalog YAML file.
///
/// ```yaml
/// countries:
///   - country_code: DE
///     country_name: Germany
///     ...
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    /// Country rules in declaration order.
    pub countries: Vec<CountryRule>,
}
