//! TOML rule tables.

pub mod additions;
pub mod billing;
pub mod disease;
pub mod patterns;

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::CatalogError;

pub(crate) fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| CatalogError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

pub(crate) fn require_keyword(path: &Path, table: &str, keyword: &str) -> Result<(), CatalogError> {
    if keyword.trim().is_empty() {
        return Err(CatalogError::invalid_rule(
            path,
            format!("{table} entry has an empty keyword"),
        ));
    }
    Ok(())
}
