#![deny(unsafe_code)]

//! Rule catalog: a directory of CSV/TOML rule files pinned by `manifest.toml`,
//! verified and parsed once into an immutable [`RuleCatalog`].

pub mod catalog;
pub mod csv;
pub mod error;
pub mod hash;
pub mod index;
pub mod manifest;
pub mod paths;
pub mod report;
pub mod tables;
pub mod verify;

pub use crate::catalog::{RuleCatalog, RuleTables, SEARCH_LIMIT, VerifySummary};
pub use crate::csv::mappings::load_classification_mappings;
pub use crate::error::CatalogError;
pub use crate::paths::{CATALOG_ENV_VAR, default_catalog_root};
pub use crate::report::{CatalogCounts, CatalogReport};
