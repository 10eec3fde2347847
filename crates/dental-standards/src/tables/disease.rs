//! Disease/treatment compatibility keywords by ICD-10 category.

use std::collections::BTreeMap;
use std::path::Path;

use dental_model::DiseaseCompatibility;
use serde::Deserialize;

use super::read_toml;
use crate::error::CatalogError;

#[derive(Debug, Deserialize)]
struct RawDiseaseFile {
    #[serde(default)]
    categories: BTreeMap<String, DiseaseCompatibility>,
}

pub fn parse_disease_compatibility(
    path: &Path,
) -> Result<BTreeMap<String, DiseaseCompatibility>, CatalogError> {
    let raw: RawDiseaseFile = read_toml(path)?;
    for category in raw.categories.keys() {
        if category.trim().is_empty() {
            return Err(CatalogError::invalid_rule(path, "empty disease category"));
        }
    }
    Ok(raw.categories)
}
