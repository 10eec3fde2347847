//! Catalog directory resolution.

use std::path::PathBuf;

/// Environment variable overriding the catalog directory.
pub const CATALOG_ENV_VAR: &str = "DENTAL_RULES_DIR";

/// Default catalog root.
///
/// Resolution order:
/// 1. `DENTAL_RULES_DIR` environment variable
/// 2. `standards/` at the workspace root
pub fn default_catalog_root() -> PathBuf {
    if let Ok(root) = std::env::var(CATALOG_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}
