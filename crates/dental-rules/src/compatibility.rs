//! Bundling and mutual-exclusion checks for a candidate code.

use std::collections::HashSet;

use dental_model::{
    CompatibilityResult, ExclusionRule, ExclusionWindow, TreatmentCode, contains_any,
    contains_ignore_case, first_contained,
};
use dental_standards::RuleCatalog;
use serde::Serialize;
use tracing::{debug, trace};

/// One rule hit between the candidate and a selected code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// The two treatments cannot be billed together in `window`.
    Excluded {
        candidate: String,
        selected: String,
        window: ExclusionWindow,
        explanation: Option<String>,
    },
    /// The candidate is already paid for by the selected treatment.
    Included {
        candidate: String,
        selected: String,
        explanation: Option<String>,
    },
    /// The selected treatment is paid for by the candidate.
    Bundles { candidate: String, selected: String },
}

impl Finding {
    /// Blocking findings make `can_add` false.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Excluded { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Self::Excluded {
                candidate,
                selected,
                window,
                explanation,
            } => {
                let base = format!(
                    "\"{candidate}\" and \"{selected}\" cannot be billed {}",
                    window.label()
                );
                with_explanation(base, explanation.as_deref())
            }
            Self::Included {
                candidate,
                selected,
                explanation,
            } => {
                let base = format!("\"{candidate}\" is already covered by selected \"{selected}\"");
                with_explanation(base, explanation.as_deref())
            }
            Self::Bundles {
                candidate,
                selected,
            } => format!(
                "\"{selected}\" is bundled into \"{candidate}\" and cannot be billed separately"
            ),
        }
    }
}

fn with_explanation(base: String, explanation: Option<&str>) -> String {
    match explanation {
        Some(text) if !text.is_empty() => format!("{base}: {text}"),
        _ => base,
    }
}

/// All findings for `candidate` against `selected`, in check order:
/// exclusions (candidate-side rules, then selected-side rules), forward
/// inclusions, reverse inclusions.
pub fn collect_findings(
    catalog: &RuleCatalog,
    candidate: &TreatmentCode,
    selected: &[TreatmentCode],
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for rule in catalog.exclusion_rules() {
        if contains_ignore_case(&candidate.name, &rule.keyword) {
            for other in selected {
                push_exclusions(&mut findings, rule, candidate, &other.name, &other.name);
            }
        }
    }
    for other in selected {
        for rule in catalog.exclusion_rules() {
            if contains_ignore_case(&other.name, &rule.keyword) {
                push_exclusions(&mut findings, rule, candidate, &other.name, &candidate.name);
            }
        }
    }

    for rule in catalog.inclusion_rules() {
        if !contains_ignore_case(&candidate.name, &rule.keyword) {
            continue;
        }
        for other in selected {
            if contains_any(&other.name, &rule.included_in) {
                findings.push(Finding::Included {
                    candidate: candidate.name.clone(),
                    selected: other.name.clone(),
                    explanation: rule.explanation.clone(),
                });
            }
        }
    }

    for other in selected {
        for rule in catalog.inclusion_rules() {
            if contains_ignore_case(&other.name, &rule.keyword)
                && contains_any(&candidate.name, &rule.included_in)
            {
                findings.push(Finding::Bundles {
                    candidate: candidate.name.clone(),
                    selected: other.name.clone(),
                });
            }
        }
    }

    findings
}

/// `rule` matched one side; `target` is the other side's name, tested
/// against the rule's excluded keyword sets.
fn push_exclusions(
    findings: &mut Vec<Finding>,
    rule: &ExclusionRule,
    candidate: &TreatmentCode,
    selected_name: &str,
    target: &str,
) {
    for (window, keywords) in rule.windows() {
        if let Some(keyword) = first_contained(target, keywords) {
            trace!(rule = %rule.keyword, %keyword, ?window, "exclusion hit");
            findings.push(Finding::Excluded {
                candidate: candidate.name.clone(),
                selected: selected_name.to_string(),
                window,
                explanation: rule.explanation.clone(),
            });
        }
    }
}

/// Check whether `candidate` may join `selected`.
///
/// `can_add` is false exactly when an exclusion rule fires, in either
/// direction. Identical messages are reported once.
pub fn validate_selection(
    catalog: &RuleCatalog,
    candidate: &TreatmentCode,
    selected: &[TreatmentCode],
) -> CompatibilityResult {
    let findings = collect_findings(catalog, candidate, selected);

    let mut exclusion_errors = Vec::new();
    let mut inclusion_warnings = Vec::new();
    let mut seen = HashSet::new();
    for finding in &findings {
        let message = finding.message();
        if !seen.insert(message.clone()) {
            continue;
        }
        if finding.is_blocking() {
            exclusion_errors.push(message);
        } else {
            inclusion_warnings.push(message);
        }
    }

    let (companions, companion_reason) = companion_hint(catalog, candidate, selected);

    debug!(
        code = %candidate.code,
        selected = selected.len(),
        errors = exclusion_errors.len(),
        warnings = inclusion_warnings.len(),
        "validated candidate"
    );

    CompatibilityResult {
        can_add: exclusion_errors.is_empty(),
        inclusion_warnings,
        exclusion_errors,
        companions,
        companion_reason,
    }
}

/// First companion rule for the candidate that still has uncovered companions.
fn companion_hint(
    catalog: &RuleCatalog,
    candidate: &TreatmentCode,
    selected: &[TreatmentCode],
) -> (Vec<String>, Option<String>) {
    for rule in catalog.companion_rules() {
        if !contains_ignore_case(&candidate.name, &rule.keyword) {
            continue;
        }
        let remaining: Vec<String> = rule
            .companions
            .iter()
            .filter(|companion| {
                !selected
                    .iter()
                    .any(|other| contains_ignore_case(&other.name, companion))
            })
            .cloned()
            .collect();
        if !remaining.is_empty() {
            return (remaining, Some(rule.reason.clone()));
        }
    }
    (Vec::new(), None)
}

#[cfg(test)]
mod tests {
    use dental_model::InclusionRule;
    use dental_standards::RuleTables;

    use super::*;

    fn catalog() -> RuleCatalog {
        let mut tables = RuleTables::default();
        tables.billing.exclusion.push(ExclusionRule {
            keyword: "抜髄".to_string(),
            same_day: vec!["感染根管処置".to_string()],
            ..ExclusionRule::default()
        });
        tables.billing.inclusion.push(InclusionRule {
            keyword: "根管貼薬".to_string(),
            included_in: vec!["抜髄".to_string()],
            explanation: None,
        });
        RuleCatalog::new("t", Vec::new(), tables).unwrap()
    }

    fn code(code: &str, name: &str) -> TreatmentCode {
        TreatmentCode::new(code, name, 100)
    }

    #[test]
    fn exclusion_blocks_in_both_directions() {
        let catalog = catalog();
        let pulp = code("309000110", "抜髄（単根管）");
        let infected = code("309000410", "感染根管処置（単根管）");

        let forward = validate_selection(&catalog, &pulp, std::slice::from_ref(&infected));
        let reverse = validate_selection(&catalog, &infected, std::slice::from_ref(&pulp));
        assert!(!forward.can_add);
        assert!(!reverse.can_add);
        assert_eq!(forward.exclusion_errors.len(), 1);
        assert_eq!(reverse.exclusion_errors.len(), 1);
        for message in forward.exclusion_errors.iter().chain(&reverse.exclusion_errors) {
            assert!(message.contains("抜髄（単根管）"));
            assert!(message.contains("感染根管処置（単根管）"));
            assert!(message.contains("on the same day"));
        }
    }

    #[test]
    fn inclusion_warns_without_blocking() {
        let catalog = catalog();
        let pulp = code("309000110", "抜髄（単根管）");
        let dressing = code("309000610", "根管貼薬処置");

        let forward = validate_selection(&catalog, &dressing, std::slice::from_ref(&pulp));
        assert!(forward.can_add);
        assert_eq!(forward.inclusion_warnings.len(), 1);
        assert!(forward.inclusion_warnings[0].contains("already covered"));

        let reverse = validate_selection(&catalog, &pulp, std::slice::from_ref(&dressing));
        assert!(reverse.can_add);
        assert_eq!(reverse.inclusion_warnings.len(), 1);
        assert!(reverse.inclusion_warnings[0].contains("bundled into"));
    }

    #[test]
    fn empty_selection_is_clean() {
        let result = validate_selection(&catalog(), &code("1", "抜髄"), &[]);
        assert!(result.can_add);
        assert!(result.inclusion_warnings.is_empty());
        assert!(result.exclusion_errors.is_empty());
    }
}
