pub mod classification;
pub mod compatibility;
pub mod diagnosis;
pub mod error;
pub mod suggestion;
pub mod text;
pub mod treatment;

pub use classification::{
    ClassificationDetail, ClassificationItem, ClassificationMapping, ClassificationOutcome,
    ClassificationResult, ClassificationSource, ConditionOperator, MatchingCondition,
    QuestionDefinition, ResponseData,
};
pub use compatibility::CompatibilityResult;
pub use diagnosis::{DiagnosisCode, DiseaseCheckResult, DiseaseCompatibility, TreatmentRef};
pub use error::ModelError;
pub use suggestion::{
    AdditionContext, NextStep, RelatedPattern, SequentialPattern, SuggestionEntry, SuggestionKind,
};
pub use text::{contains_any, contains_ignore_case, first_contained, leading_chars};
pub use treatment::{
    AdditionKind, AdditionRule, AgeSubtype, CATEGORY_LEN, CompanionRule, ExclusionRule,
    ExclusionWindow, InclusionRule, TimeSubtype, TreatmentCode, VisitSubtype,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compatibility_result_serializes() {
        let result = CompatibilityResult {
            can_add: false,
            inclusion_warnings: vec![],
            exclusion_errors: vec!["conflict".to_string()],
            companions: vec![],
            companion_reason: None,
        };
        let json = serde_json::to_string(&result).expect("serialize result");
        let round: CompatibilityResult = serde_json::from_str(&json).expect("deserialize result");
        assert_eq!(round, result);
    }

    #[test]
    fn suggestion_entry_uses_snake_case_kind() {
        let entry = SuggestionEntry {
            code: "309000110".to_string(),
            name: "根管貼薬".to_string(),
            points: 32,
            reason: "follow-up".to_string(),
            kind: SuggestionKind::CommonlyUsed,
            priority: 4,
            auto_add: false,
        };
        let value = serde_json::to_value(&entry).expect("serialize entry");
        assert_eq!(value["kind"], "commonly_used");
    }
}
