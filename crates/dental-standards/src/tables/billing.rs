//! Inclusion, exclusion and companion keyword tables.

use std::path::Path;

use dental_model::{CompanionRule, ExclusionRule, InclusionRule};
use serde::Deserialize;

use super::{read_toml, require_keyword};
use crate::error::CatalogError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BillingTables {
    #[serde(default)]
    pub inclusion: Vec<InclusionRule>,
    #[serde(default)]
    pub exclusion: Vec<ExclusionRule>,
    #[serde(default, rename = "companion")]
    pub companions: Vec<CompanionRule>,
}

pub fn parse_billing_rules(path: &Path) -> Result<BillingTables, CatalogError> {
    let tables: BillingTables = read_toml(path)?;

    for rule in &tables.inclusion {
        require_keyword(path, "inclusion", &rule.keyword)?;
    }
    for rule in &tables.exclusion {
        require_keyword(path, "exclusion", &rule.keyword)?;
        if rule.excluded_keywords().next().is_none() {
            return Err(CatalogError::invalid_rule(
                path,
                format!("exclusion rule '{}' excludes nothing", rule.keyword),
            ));
        }
    }
    for rule in &tables.companions {
        require_keyword(path, "companion", &rule.keyword)?;
    }

    Ok(tables)
}
