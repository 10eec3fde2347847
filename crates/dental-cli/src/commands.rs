use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use dental_model::{
    ClassificationOutcome, CompatibilityResult, DiseaseCheckResult, QuestionDefinition,
    ResponseData, SuggestionEntry, TreatmentCode,
};
use dental_rules::{
    calculate_additions, check_disease_treatment_compatibility, evaluate_classification,
    sort_mappings, suggest_for_selection, validate_selection,
};
use dental_standards::{
    CatalogReport, RuleCatalog, VerifySummary, default_catalog_root,
    load_classification_mappings,
};
use tracing::{debug, info, info_span, warn};

use crate::requests::{
    AdditionsRequest, DiseaseCheckRequest, SuggestRequest, ValidateRequest, resolve_codes,
};

/// Verify and load the catalog at `root` (or the default location),
/// optionally restricted to codes billable on `as_of`.
pub fn load_catalog(
    root: Option<&Path>,
    as_of: Option<NaiveDate>,
) -> Result<(RuleCatalog, VerifySummary)> {
    let root = root.map_or_else(default_catalog_root, Path::to_path_buf);
    let span = info_span!("catalog", dir = %root.display());
    let _guard = span.enter();
    let (catalog, summary) = RuleCatalog::verify_and_load(&root)
        .with_context(|| format!("load rule catalog from {}", root.display()))?;
    info!(version = %summary.version, codes = catalog.len(), "catalog loaded");
    let catalog = match as_of {
        Some(date) => catalog.effective_on(date),
        None => catalog,
    };
    Ok((catalog, summary))
}

pub fn run_catalog(root: Option<&Path>) -> Result<CatalogReport> {
    let (catalog, summary) = load_catalog(root, None)?;
    Ok(CatalogReport::from_verify_summary(
        &summary,
        catalog.files().to_vec(),
    ))
}

/// The candidate must exist; unknown selected codes are skipped.
pub fn run_validate(
    catalog: &RuleCatalog,
    request: &ValidateRequest,
) -> Result<CompatibilityResult> {
    let candidate = require_code(catalog, &request.new_code)?;
    let selected = resolve_codes(catalog, &request.selected);
    let _guard = info_span!("validate", code = %candidate.code).entered();
    Ok(validate_selection(catalog, candidate, &selected))
}

pub fn run_additions(
    catalog: &RuleCatalog,
    request: &AdditionsRequest,
) -> Result<Vec<SuggestionEntry>> {
    let code = require_code(catalog, &request.code)?;
    let _guard = info_span!("additions", code = %code.code).entered();
    Ok(calculate_additions(code, &request.context))
}

/// Follow-ons for the last selected code. Nothing is suggested when that
/// code is not in the catalog; unknown earlier codes are skipped.
pub fn run_suggest(catalog: &RuleCatalog, request: &SuggestRequest) -> Vec<SuggestionEntry> {
    let Some((last_id, earlier)) = request.selected.split_last() else {
        return Vec::new();
    };
    let Some(last) = catalog.get(last_id.trim()) else {
        warn!(code = %last_id, "last selected code not in catalog, no suggestions");
        return Vec::new();
    };
    let mut selection = resolve_codes(catalog, earlier);
    selection.push(last.clone());
    let _guard = info_span!("suggest", code = %last.code, selected = selection.len()).entered();
    suggest_for_selection(catalog, &selection, &request.context)
}

pub fn run_disease_check(
    catalog: &RuleCatalog,
    request: &DiseaseCheckRequest,
) -> DiseaseCheckResult {
    let _guard = info_span!("disease_check").entered();
    check_disease_treatment_compatibility(catalog, &request.diagnoses, &request.treatments)
}

/// Evaluate questionnaire answers. Mapping rows come from `mappings` when
/// given, else from the catalog.
pub fn run_classify(
    catalog: &RuleCatalog,
    responses: &ResponseData,
    questions: &[QuestionDefinition],
    mappings: Option<&Path>,
) -> Result<ClassificationOutcome> {
    let _guard = info_span!("classify", answers = responses.len()).entered();
    let mut rows = match mappings {
        Some(path) => load_classification_mappings(path)
            .with_context(|| format!("load classification mappings from {}", path.display()))?,
        None => catalog.classification_mappings().to_vec(),
    };
    debug!(rows = rows.len(), "classification mappings ready");
    sort_mappings(&mut rows);
    Ok(evaluate_classification(responses, &rows, questions))
}

pub fn run_search<'c>(
    catalog: &'c RuleCatalog,
    keyword: &str,
    category: Option<&str>,
) -> Vec<&'c TreatmentCode> {
    catalog.search(keyword, category)
}

fn require_code<'c>(catalog: &'c RuleCatalog, id: &str) -> Result<&'c TreatmentCode> {
    catalog
        .get(id.trim())
        .ok_or_else(|| anyhow!("unknown treatment code {id} in catalog {}", catalog.version()))
}
