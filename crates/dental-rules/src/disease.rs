//! Advisory diagnosis/treatment cross-check by ICD-10 category.

use dental_model::{DiagnosisCode, DiseaseCheckResult, TreatmentRef, contains_any};
use dental_standards::RuleCatalog;
use tracing::{debug, trace};

pub const NO_DIAGNOSIS_WARNING: &str = "no diagnosis selected";
pub const NO_TREATMENT_WARNING: &str = "no treatment selected";

/// Compatible keywords quoted in a suggestion.
const SUGGESTED_KEYWORDS: usize = 3;

/// Cross-check `treatments` against each diagnosis' category keywords.
///
/// Categories without a row are not checked. `is_valid` only reports
/// whether any incompatibility was found; nothing here blocks billing.
pub fn check_disease_treatment_compatibility(
    catalog: &RuleCatalog,
    diagnoses: &[DiagnosisCode],
    treatments: &[TreatmentRef],
) -> DiseaseCheckResult {
    if diagnoses.is_empty() {
        return advisory(NO_DIAGNOSIS_WARNING);
    }
    if treatments.is_empty() {
        return advisory(NO_TREATMENT_WARNING);
    }

    let mut result = DiseaseCheckResult::default();
    for diagnosis in diagnoses {
        let Some(rule) = catalog.disease_rule(diagnosis.category()) else {
            trace!(icd10 = %diagnosis.icd10_code, "no compatibility row");
            continue;
        };

        for treatment in treatments {
            if contains_any(&treatment.name, &rule.incompatible) {
                result.errors.push(format!(
                    "\"{}\" is not normally indicated for \"{}\"",
                    treatment.name, diagnosis.name
                ));
            }
            if contains_any(&treatment.name, &rule.warning) {
                result.warnings.push(format!(
                    "\"{}\" for \"{}\" needs careful clinical judgement",
                    treatment.name, diagnosis.name
                ));
            }
        }

        if !rule.compatible.is_empty()
            && !treatments
                .iter()
                .any(|treatment| contains_any(&treatment.name, &rule.compatible))
        {
            let examples: Vec<&str> = rule
                .compatible
                .iter()
                .take(SUGGESTED_KEYWORDS)
                .map(String::as_str)
                .collect();
            result.suggestions.push(format!(
                "\"{}\" is usually treated with {}",
                diagnosis.name,
                examples.join(", ")
            ));
        }
    }

    result.is_valid = result.errors.is_empty();
    debug!(
        diagnoses = diagnoses.len(),
        treatments = treatments.len(),
        errors = result.errors.len(),
        "disease check done"
    );
    result
}

fn advisory(warning: &str) -> DiseaseCheckResult {
    DiseaseCheckResult {
        is_valid: true,
        warnings: vec![warning.to_string()],
        ..DiseaseCheckResult::default()
    }
}
