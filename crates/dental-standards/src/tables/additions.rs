//! Addition rule groups and their name bindings.
//!
//! ```toml
//! [[groups]]
//! name = "treatment"
//! rules = [{ kind = "age", subtype = "under_6_infant", rate = 0.5, description = "..." }]
//!
//! [[bindings]]
//! group = "treatment"
//! keywords = ["抜髄", "充填"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use dental_model::{AdditionKind, AdditionRule, first_contained};
use serde::Deserialize;

use super::read_toml;
use crate::error::CatalogError;

#[derive(Debug, Deserialize)]
struct RawAdditionFile {
    #[serde(default)]
    groups: Vec<RawGroup>,
    #[serde(default)]
    bindings: Vec<Binding>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    name: String,
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    kind: String,
    subtype: String,
    rate: f64,
    #[serde(default)]
    description: String,
}

/// Binds every treatment whose name contains one of `keywords` to `group`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Binding {
    pub group: String,
    pub keywords: Vec<String>,
}

/// Named addition-rule groups plus ordered name bindings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdditionTable {
    pub groups: BTreeMap<String, Vec<AdditionRule>>,
    pub bindings: Vec<Binding>,
}

impl AdditionTable {
    /// Rules of the first binding whose keyword occurs in `name`.
    pub fn rules_for(&self, name: &str) -> &[AdditionRule] {
        self.bindings
            .iter()
            .find(|binding| first_contained(name, &binding.keywords).is_some())
            .and_then(|binding| self.groups.get(&binding.group))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

pub fn parse_addition_rules(path: &Path) -> Result<AdditionTable, CatalogError> {
    let raw: RawAdditionFile = read_toml(path)?;

    let mut groups = BTreeMap::new();
    for group in raw.groups {
        let mut rules = Vec::with_capacity(group.rules.len());
        for rule in group.rules {
            let kind = AdditionKind::parse(&rule.kind, &rule.subtype).map_err(|e| {
                CatalogError::invalid_rule(path, format!("group {}: {e}", group.name))
            })?;
            if !rule.rate.is_finite() || rule.rate < 0.0 {
                return Err(CatalogError::invalid_rule(
                    path,
                    format!(
                        "group {}: rate {} is not a non-negative number",
                        group.name, rule.rate
                    ),
                ));
            }
            rules.push(AdditionRule {
                kind,
                rate: rule.rate,
                description: rule.description,
            });
        }
        if groups.insert(group.name.clone(), rules).is_some() {
            return Err(CatalogError::invalid_rule(
                path,
                format!("duplicate addition group: {}", group.name),
            ));
        }
    }

    for binding in &raw.bindings {
        if !groups.contains_key(&binding.group) {
            return Err(CatalogError::invalid_rule(
                path,
                format!("binding names undefined group: {}", binding.group),
            ));
        }
    }

    Ok(AdditionTable {
        groups,
        bindings: raw.bindings,
    })
}
