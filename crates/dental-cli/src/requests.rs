//! JSON request files accepted by the evaluator commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dental_model::{AdditionContext, DiagnosisCode, TreatmentCode, TreatmentRef};
use dental_standards::RuleCatalog;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// `validate`: may `new_code` join the codes in `selected`?
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidateRequest {
    pub new_code: String,
    #[serde(default)]
    pub selected: Vec<String>,
}

/// `additions`: surcharges for one code under a visit context.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdditionsRequest {
    pub code: String,
    #[serde(default)]
    pub context: AdditionContext,
}

/// `suggest`: follow-ons for the last code of `selected`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub selected: Vec<String>,
    #[serde(default)]
    pub context: AdditionContext,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DiseaseCheckRequest {
    #[serde(default)]
    pub diagnoses: Vec<DiagnosisCode>,
    #[serde(default)]
    pub treatments: Vec<TreatmentRef>,
}

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
}

/// Catalog entries for `ids`, in request order. Unknown ids are logged and skipped.
pub fn resolve_codes(catalog: &RuleCatalog, ids: &[String]) -> Vec<TreatmentCode> {
    ids.iter()
        .filter_map(|id| {
            let found = catalog.get(id.trim()).cloned();
            if found.is_none() {
                warn!(code = %id, "unknown treatment code skipped");
            }
            found
        })
        .collect()
}
