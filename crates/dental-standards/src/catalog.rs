#![deny(unsafe_code)]

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use dental_model::{
    ClassificationMapping, CompanionRule, DiseaseCompatibility, ExclusionRule, InclusionRule,
    RelatedPattern, SequentialPattern, TreatmentCode, contains_ignore_case,
};
use regex::{Regex, RegexBuilder};
use tracing::{debug, info_span};

use crate::csv::mappings::load_classification_mappings;
use crate::csv::treatment_codes::parse_treatment_codes_csv;
use crate::error::CatalogError;
use crate::index::KeywordIndex;
use crate::manifest::ManifestFile;
use crate::report::CatalogCounts;
use crate::tables::additions::parse_addition_rules;
use crate::tables::billing::{BillingTables, parse_billing_rules};
use crate::tables::disease::parse_disease_compatibility;
use crate::tables::patterns::{SuggestionPatterns, parse_suggestion_patterns};
use crate::verify::{require_role_path, role_path, verify_manifest};

/// Maximum number of rows returned by [`RuleCatalog::search`].
pub const SEARCH_LIMIT: usize = 20;

/// Keyword tables shared by every treatment code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTables {
    pub billing: BillingTables,
    pub patterns: SuggestionPatterns,
    /// Keyed by ICD-10 category (e.g. "K02").
    pub disease: BTreeMap<String, DiseaseCompatibility>,
    pub classification_mappings: Vec<ClassificationMapping>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct VerifySummary {
    pub catalog_dir: PathBuf,
    pub version: String,
    pub file_count: usize,
    pub counts: CatalogCounts,
}

/// Immutable rule catalog. Codes are held in code order.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    version: String,
    files: Vec<ManifestFile>,
    codes: Vec<TreatmentCode>,
    positions: HashMap<String, usize>,
    tables: RuleTables,
    /// Compiled `tables.patterns.sequential` triggers, same order.
    triggers: Vec<Regex>,
    index: KeywordIndex,
}

impl RuleCatalog {
    /// Build a catalog from in-memory parts.
    ///
    /// Codes are sorted by code; duplicates and invalid trigger patterns are
    /// rejected.
    pub fn new(
        version: impl Into<String>,
        mut codes: Vec<TreatmentCode>,
        tables: RuleTables,
    ) -> Result<Self, CatalogError> {
        codes.sort_by(|a, b| a.code.cmp(&b.code));
        if let Some(pair) = codes.windows(2).find(|pair| pair[0].code == pair[1].code) {
            return Err(CatalogError::DuplicateCode {
                code: pair[0].code.clone(),
            });
        }

        let triggers = tables
            .patterns
            .sequential
            .iter()
            .map(|pattern| compile_trigger(&pattern.trigger))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::assemble(version.into(), Vec::new(), codes, tables, triggers))
    }

    /// Verify `catalog_dir/manifest.toml` and load every role it lists.
    pub fn verify_and_load(catalog_dir: &Path) -> Result<(Self, VerifySummary), CatalogError> {
        let span = info_span!("catalog_load", dir = %catalog_dir.display());
        let _guard = span.enter();

        let (manifest, files) = verify_manifest(catalog_dir)?;

        let additions =
            parse_addition_rules(&require_role_path(catalog_dir, &files, "addition_rules")?)?;
        let mut codes = parse_treatment_codes_csv(&require_role_path(
            catalog_dir,
            &files,
            "treatment_codes",
        )?)?;
        for code in &mut codes {
            code.addition_rules = additions.rules_for(&code.name).to_vec();
        }
        debug!(
            codes = codes.len(),
            addition_groups = additions.groups.len(),
            "parsed treatment codes"
        );

        let billing =
            parse_billing_rules(&require_role_path(catalog_dir, &files, "billing_rules")?)?;
        let patterns = parse_suggestion_patterns(&require_role_path(
            catalog_dir,
            &files,
            "suggestion_patterns",
        )?)?;
        let disease = parse_disease_compatibility(&require_role_path(
            catalog_dir,
            &files,
            "disease_compatibility",
        )?)?;
        let classification_mappings =
            match role_path(catalog_dir, &files, "classification_mappings") {
                Some(path) => load_classification_mappings(&path)?,
                None => Vec::new(),
            };

        let tables = RuleTables {
            billing,
            patterns,
            disease,
            classification_mappings,
        };
        let mut catalog = Self::new(manifest.catalog.version.clone(), codes, tables)?;
        catalog.files = files;

        let summary = VerifySummary {
            catalog_dir: catalog_dir.to_path_buf(),
            version: catalog.version.clone(),
            file_count: catalog.files.len(),
            counts: CatalogCounts::of(&catalog, additions.groups.len()),
        };
        debug!(
            version = %summary.version,
            indexed_keywords = catalog.index.len(),
            "catalog loaded"
        );

        Ok((catalog, summary))
    }

    fn assemble(
        version: String,
        files: Vec<ManifestFile>,
        codes: Vec<TreatmentCode>,
        tables: RuleTables,
        triggers: Vec<Regex>,
    ) -> Self {
        let positions = codes
            .iter()
            .enumerate()
            .map(|(idx, code)| (code.code.clone(), idx))
            .collect();
        let index = KeywordIndex::build(&codes, indexed_keywords(&tables));
        Self {
            version,
            files,
            codes,
            positions,
            tables,
            triggers,
            index,
        }
    }

    /// The same catalog restricted to codes billable on `date`.
    #[must_use]
    pub fn effective_on(&self, date: NaiveDate) -> Self {
        let codes = self
            .codes
            .iter()
            .filter(|code| code.is_effective_on(date))
            .cloned()
            .collect::<Vec<_>>();
        debug!(
            %date,
            kept = codes.len(),
            total = self.codes.len(),
            "restricted catalog by date"
        );
        Self::assemble(
            self.version.clone(),
            self.files.clone(),
            codes,
            self.tables.clone(),
            self.triggers.clone(),
        )
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Manifest files, sorted by path. Empty for in-memory catalogs.
    pub fn files(&self) -> &[ManifestFile] {
        &self.files
    }

    pub fn get(&self, code: &str) -> Option<&TreatmentCode> {
        self.positions.get(code).map(|&idx| &self.codes[idx])
    }

    pub fn codes(&self) -> &[TreatmentCode] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    /// Codes whose name contains `keyword` (case-insensitive), in code order.
    ///
    /// Answers from the keyword index when the keyword is indexed and scans
    /// otherwise; both paths give the same result.
    pub fn codes_matching(&self, keyword: &str) -> Vec<&TreatmentCode> {
        if keyword.is_empty() {
            return Vec::new();
        }
        match self.index.lookup(keyword) {
            Some(positions) => positions.iter().map(|&idx| &self.codes[idx]).collect(),
            None => self
                .codes
                .iter()
                .filter(|code| contains_ignore_case(&code.name, keyword))
                .collect(),
        }
    }

    /// Manual search: name or code contains `keyword`, optionally limited to
    /// one category. At most [`SEARCH_LIMIT`] rows.
    pub fn search(&self, keyword: &str, category: Option<&str>) -> Vec<&TreatmentCode> {
        let keyword = keyword.trim();
        self.codes
            .iter()
            .filter(|code| category.is_none_or(|category| code.category() == category))
            .filter(|code| {
                keyword.is_empty()
                    || contains_ignore_case(&code.name, keyword)
                    || contains_ignore_case(&code.code, keyword)
            })
            .take(SEARCH_LIMIT)
            .collect()
    }

    pub fn inclusion_rules(&self) -> &[InclusionRule] {
        &self.tables.billing.inclusion
    }

    pub fn exclusion_rules(&self) -> &[ExclusionRule] {
        &self.tables.billing.exclusion
    }

    pub fn companion_rules(&self) -> &[CompanionRule] {
        &self.tables.billing.companions
    }

    pub fn sequential_patterns(&self) -> &[SequentialPattern] {
        &self.tables.patterns.sequential
    }

    /// First sequential pattern whose trigger matches `name`.
    pub fn matching_sequential(&self, name: &str) -> Option<&SequentialPattern> {
        self.triggers
            .iter()
            .position(|trigger| trigger.is_match(name))
            .map(|idx| &self.tables.patterns.sequential[idx])
    }

    /// Related patterns for a 3-character category; empty when none.
    pub fn related_patterns(&self, category: &str) -> &[RelatedPattern] {
        self.tables
            .patterns
            .related
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn disease_rule(&self, category: &str) -> Option<&DiseaseCompatibility> {
        self.tables.disease.get(category)
    }

    pub fn classification_mappings(&self) -> &[ClassificationMapping] {
        &self.tables.classification_mappings
    }
}

fn compile_trigger(pattern: &str) -> Result<Regex, CatalogError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| CatalogError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Keywords the evaluators look codes up by.
fn indexed_keywords(tables: &RuleTables) -> impl Iterator<Item = &str> {
    let sequential = tables
        .patterns
        .sequential
        .iter()
        .flat_map(|pattern| &pattern.next_steps)
        .map(|step| step.keyword.as_str());
    let related = tables
        .patterns
        .related
        .values()
        .flatten()
        .flat_map(|entry| &entry.keywords)
        .map(String::as_str);
    let companions = tables
        .billing
        .companions
        .iter()
        .flat_map(|rule| &rule.companions)
        .map(String::as_str);
    sequential.chain(related).chain(companions)
}
