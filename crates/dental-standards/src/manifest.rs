#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};

pub const MANIFEST_SCHEMA: &str = "dental-rules.catalog-manifest";
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub catalog: CatalogHeader,
    #[serde(default)]
    pub notes: Option<ManifestNotes>,
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogHeader {
    pub schema: String,
    pub schema_version: u32,
    /// Rule-set release identifier, e.g. "2024.06".
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestNotes {
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub sha256: String,
    pub kind: String,
    pub role: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A manifest role and the file kind it must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSpec {
    pub role: &'static str,
    pub kind: &'static str,
    pub required: bool,
}

pub const ROLES: &[RoleSpec] = &[
    RoleSpec {
        role: "treatment_codes",
        kind: "csv",
        required: true,
    },
    RoleSpec {
        role: "addition_rules",
        kind: "toml",
        required: true,
    },
    RoleSpec {
        role: "billing_rules",
        kind: "toml",
        required: true,
    },
    RoleSpec {
        role: "suggestion_patterns",
        kind: "toml",
        required: true,
    },
    RoleSpec {
        role: "disease_compatibility",
        kind: "toml",
        required: true,
    },
    RoleSpec {
        role: "classification_mappings",
        kind: "csv",
        required: false,
    },
];

pub fn role_spec(role: &str) -> Option<&'static RoleSpec> {
    ROLES.iter().find(|spec| spec.role == role)
}
