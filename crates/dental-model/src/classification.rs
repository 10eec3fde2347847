//! Questionnaire answers and the oral-function C-classification derived from them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Answers keyed by question id. `null` and absent both mean "no answer".
pub type ResponseData = BTreeMap<String, serde_json::Value>;

/// A questionnaire question definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub id: String,
    pub section_name: String,
    pub question_text: String,
}

impl QuestionDefinition {
    /// `section::question` key used to resolve mapping rows.
    pub fn composite_key(&self) -> String {
        composite_key(&self.section_name, &self.question_text)
    }
}

pub fn composite_key(section_name: &str, question_text: &str) -> String {
    format!("{section_name}::{question_text}")
}

/// A numbered C-classification item, written `C-<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassificationItem(u8);

impl ClassificationItem {
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    pub const fn number(&self) -> u8 {
        self.0
    }
}

impl FromStr for ClassificationItem {
    type Err = ModelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("C-")
            .or_else(|| trimmed.strip_prefix("c-"))
            .unwrap_or(trimmed);
        digits
            .parse::<u8>()
            .map(Self)
            .map_err(|_| ModelError::InvalidClassificationItem(raw.to_string()))
    }
}

impl fmt::Display for ClassificationItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

impl Serialize for ClassificationItem {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClassificationItem {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Matching operator of a mapping row. Unknown operators are kept, never matched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionOperator {
    Contains,
    HasAnyValue,
    IsNotEmpty,
    Unknown(String),
}

impl From<String> for ConditionOperator {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "contains" => Self::Contains,
            "has_any_value" => Self::HasAnyValue,
            "is_not_empty" => Self::IsNotEmpty,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<ConditionOperator> for String {
    fn from(op: ConditionOperator) -> Self {
        match op {
            ConditionOperator::Contains => "contains".to_string(),
            ConditionOperator::HasAnyValue => "has_any_value".to_string(),
            ConditionOperator::IsNotEmpty => "is_not_empty".to_string(),
            ConditionOperator::Unknown(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingCondition {
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Links one questionnaire question to a classification item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMapping {
    /// Item label as stored, e.g. "C-7".
    pub classification_item: String,
    pub section_name: String,
    pub question_text: String,
    pub matching_condition: MatchingCondition,
    #[serde(default)]
    pub priority: i32,
}

impl ClassificationMapping {
    pub fn composite_key(&self) -> String {
        composite_key(&self.section_name, &self.question_text)
    }

    /// Human-readable label used in notes and matched-question lists.
    pub fn label(&self) -> String {
        format!("{}: {}", self.section_name, self.question_text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    Questionnaire,
    RequiresStaffEvaluation,
}

/// Final per-item result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub result: Option<bool>,
    pub source: Option<ClassificationSource>,
    pub notes: Option<String>,
    pub matched_questions: Vec<String>,
}

/// Per-item evaluation trail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationDetail {
    pub result: Option<bool>,
    pub source: Option<ClassificationSource>,
    pub matched_questions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationOutcome {
    pub results: BTreeMap<ClassificationItem, ClassificationResult>,
    pub details: BTreeMap<ClassificationItem, ClassificationDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_item_labels() {
        assert_eq!("C-7".parse::<ClassificationItem>(), Ok(ClassificationItem::new(7)));
        assert_eq!("c-12".parse::<ClassificationItem>(), Ok(ClassificationItem::new(12)));
        assert_eq!("4".parse::<ClassificationItem>(), Ok(ClassificationItem::new(4)));
        assert!("C-x".parse::<ClassificationItem>().is_err());
        assert_eq!(ClassificationItem::new(13).to_string(), "C-13");
    }

    #[test]
    fn operator_round_trips_unknown_values() {
        let op: ConditionOperator = serde_json::from_str("\"equals\"").unwrap();
        assert_eq!(op, ConditionOperator::Unknown("equals".to_string()));
        assert_eq!(serde_json::to_string(&op).unwrap(), "\"equals\"");
    }

    #[test]
    fn outcome_keys_serialize_as_labels() {
        let mut outcome = ClassificationOutcome::default();
        outcome
            .results
            .insert(ClassificationItem::new(4), ClassificationResult::default());
        let value = serde_json::to_value(&outcome).unwrap();
        assert!(value["results"].get("C-4").is_some());
    }
}
