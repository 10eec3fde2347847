//! C-classification auto-evaluation from questionnaire answers.

use std::collections::{BTreeMap, HashMap};

use dental_model::{
    ClassificationDetail, ClassificationItem, ClassificationMapping, ClassificationOutcome,
    ClassificationResult, ClassificationSource, ConditionOperator, MatchingCondition,
    QuestionDefinition, ResponseData,
};
use serde_json::Value;
use tracing::{debug, trace};

/// Items that always need a clinician, whatever the answers say.
pub const STAFF_ONLY_ITEMS: [ClassificationItem; 7] = [
    ClassificationItem::new(1),
    ClassificationItem::new(2),
    ClassificationItem::new(3),
    ClassificationItem::new(7),
    ClassificationItem::new(9),
    ClassificationItem::new(12),
    ClassificationItem::new(13),
];

pub const STAFF_EVALUATION_NOTE: &str = "requires staff clinical evaluation";

const AUTO_EVALUATED_PREFIX: &str = "auto-evaluated: ";

/// Whether a present, non-null `answer` satisfies `condition`.
pub fn evaluate_condition(answer: &Value, condition: &MatchingCondition) -> bool {
    match &condition.operator {
        ConditionOperator::Contains => match answer {
            Value::Array(values) => values.contains(&condition.value),
            scalar => *scalar == condition.value,
        },
        ConditionOperator::HasAnyValue => match answer {
            Value::Array(values) => !values.is_empty(),
            scalar => is_filled(scalar),
        },
        ConditionOperator::IsNotEmpty => is_filled(answer),
        ConditionOperator::Unknown(_) => false,
    }
}

fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}

/// Sort item-ascending, then priority-descending. Unparseable items go last.
pub fn sort_mappings(mappings: &mut [ClassificationMapping]) {
    mappings.sort_by(|a, b| {
        let item_a = a.classification_item.parse::<ClassificationItem>().ok();
        let item_b = b.classification_item.parse::<ClassificationItem>().ok();
        match (item_a, item_b) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
        .then_with(|| b.priority.cmp(&a.priority))
    });
}

/// Evaluate every mapped item against `responses`, then force the
/// staff-only items to "needs clinician".
///
/// An item matches when any of its mappings matches; every matching
/// mapping contributes a label. Mappings whose question is not in
/// `questions` are skipped.
pub fn evaluate_classification(
    responses: &ResponseData,
    mappings: &[ClassificationMapping],
    questions: &[QuestionDefinition],
) -> ClassificationOutcome {
    let question_ids: HashMap<String, &str> = questions
        .iter()
        .map(|q| (q.composite_key(), q.id.as_str()))
        .collect();

    let mut groups: BTreeMap<ClassificationItem, Vec<&ClassificationMapping>> = BTreeMap::new();
    for mapping in mappings {
        match mapping.classification_item.parse::<ClassificationItem>() {
            Ok(item) => groups.entry(item).or_default().push(mapping),
            Err(e) => debug!(error = %e, "skipping mapping"),
        }
    }

    let mut outcome = ClassificationOutcome::default();
    for (item, group) in groups {
        let mut matched = Vec::new();
        for mapping in group {
            let Some(id) = question_ids.get(&mapping.composite_key()) else {
                trace!(%item, key = %mapping.composite_key(), "question not found");
                continue;
            };
            let Some(answer) = responses.get(*id).filter(|answer| !answer.is_null()) else {
                continue;
            };
            if evaluate_condition(answer, &mapping.matching_condition) {
                matched.push(mapping.label());
            }
        }

        let has_match = !matched.is_empty();
        let source = has_match.then_some(ClassificationSource::Questionnaire);
        outcome.results.insert(
            item,
            ClassificationResult {
                result: Some(has_match),
                source,
                notes: has_match
                    .then(|| format!("{AUTO_EVALUATED_PREFIX}{}", matched.join(", "))),
                matched_questions: matched.clone(),
            },
        );
        outcome.details.insert(
            item,
            ClassificationDetail {
                result: Some(has_match),
                source,
                matched_questions: matched,
                message: None,
            },
        );
    }

    for item in STAFF_ONLY_ITEMS {
        outcome.results.insert(
            item,
            ClassificationResult {
                result: None,
                source: None,
                notes: Some(STAFF_EVALUATION_NOTE.to_string()),
                matched_questions: Vec::new(),
            },
        );
        outcome.details.insert(
            item,
            ClassificationDetail {
                result: None,
                source: Some(ClassificationSource::RequiresStaffEvaluation),
                matched_questions: Vec::new(),
                message: Some(STAFF_EVALUATION_NOTE.to_string()),
            },
        );
    }

    debug!(items = outcome.results.len(), "classification evaluated");
    outcome
}
