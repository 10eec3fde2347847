#![deny(unsafe_code)]

use crate::catalog::{RuleCatalog, VerifySummary};
use crate::manifest::ManifestFile;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CatalogCounts {
    pub treatment_codes: usize,
    pub addition_groups: usize,
    pub codes_with_additions: usize,
    pub inclusion_rules: usize,
    pub exclusion_rules: usize,
    pub companion_rules: usize,
    pub sequential_patterns: usize,
    pub related_categories: usize,
    pub disease_categories: usize,
    pub classification_mappings: usize,
}

impl CatalogCounts {
    pub fn of(catalog: &RuleCatalog, addition_groups: usize) -> Self {
        let tables = catalog.tables();
        Self {
            treatment_codes: catalog.len(),
            addition_groups,
            codes_with_additions: catalog
                .codes()
                .iter()
                .filter(|code| !code.addition_rules.is_empty())
                .count(),
            inclusion_rules: tables.billing.inclusion.len(),
            exclusion_rules: tables.billing.exclusion.len(),
            companion_rules: tables.billing.companions.len(),
            sequential_patterns: tables.patterns.sequential.len(),
            related_categories: tables.patterns.related.len(),
            disease_categories: tables.disease.len(),
            classification_mappings: tables.classification_mappings.len(),
        }
    }
}

/// Verification report for `dental-rules catalog`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CatalogReport {
    pub schema: String,
    pub schema_version: u32,
    pub version: String,
    pub files: Vec<ManifestFile>,
    pub counts: CatalogCounts,
}

impl CatalogReport {
    pub fn from_verify_summary(summary: &VerifySummary, files: Vec<ManifestFile>) -> Self {
        Self {
            schema: "dental-rules.catalog-report".to_string(),
            schema_version: 1,
            version: summary.version.clone(),
            files,
            counts: summary.counts.clone(),
        }
    }
}
