//! Sequential and related suggestion patterns.

use std::collections::BTreeMap;
use std::path::Path;

use dental_model::{CATEGORY_LEN, RelatedPattern, SequentialPattern};
use serde::Deserialize;

use super::{read_toml, require_keyword};
use crate::error::CatalogError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SuggestionPatterns {
    /// Checked in file order; the first matching trigger wins.
    #[serde(default)]
    pub sequential: Vec<SequentialPattern>,
    /// Keyed by 3-character treatment category.
    #[serde(default)]
    pub related: BTreeMap<String, Vec<RelatedPattern>>,
}

pub fn parse_suggestion_patterns(path: &Path) -> Result<SuggestionPatterns, CatalogError> {
    let patterns: SuggestionPatterns = read_toml(path)?;

    for pattern in &patterns.sequential {
        if pattern.trigger.trim().is_empty() {
            return Err(CatalogError::invalid_rule(
                path,
                "sequential pattern has an empty trigger",
            ));
        }
        for step in &pattern.next_steps {
            require_keyword(path, "sequential step", &step.keyword)?;
        }
    }
    for (category, entries) in &patterns.related {
        if category.chars().count() != CATEGORY_LEN {
            return Err(CatalogError::invalid_rule(
                path,
                format!("related category '{category}' must be {CATEGORY_LEN} characters"),
            ));
        }
        for entry in entries {
            for keyword in &entry.keywords {
                require_keyword(path, "related", keyword)?;
            }
        }
    }

    Ok(patterns)
}
