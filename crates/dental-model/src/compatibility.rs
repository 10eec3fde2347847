use serde::{Deserialize, Serialize};

/// Outcome of checking a candidate code against the current selection.
///
/// `can_add` is false exactly when `exclusion_errors` is non-empty;
/// inclusion warnings and companion hints never block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub can_add: bool,
    pub inclusion_warnings: Vec<String>,
    pub exclusion_errors: Vec<String>,
    /// Companion treatment keywords not yet covered by the selection.
    #[serde(default)]
    pub companions: Vec<String>,
    #[serde(default)]
    pub companion_reason: Option<String>,
}
