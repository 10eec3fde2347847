//! Diagnosis codes and the disease/treatment compatibility table.

use serde::{Deserialize, Serialize};

use crate::text::leading_chars;

/// A diagnosis (disease name) with its ICD-10 code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisCode {
    pub code: String,
    pub name: String,
    pub icd10_code: String,
}

impl DiagnosisCode {
    /// ICD-10 category: the leading three characters of the ICD-10 code.
    pub fn category(&self) -> &str {
        leading_chars(self.icd10_code.trim(), 3)
    }
}

/// Minimal treatment reference used by the disease check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentRef {
    pub code: String,
    pub name: String,
}

/// Keyword lists for one ICD-10 category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiseaseCompatibility {
    pub compatible: Vec<String>,
    pub incompatible: Vec<String>,
    pub warning: Vec<String>,
}

/// Advisory disease/treatment cross-check. `is_valid` is informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseCheckResult {
    pub is_valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub suggestions: Vec<String>,
}
