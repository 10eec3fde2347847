//! Suggestion entries and the pattern tables that produce them.

use serde::{Deserialize, Serialize};

/// Why a code is being suggested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// Conditional surcharge from the point calculator.
    Addition,
    /// Next step in a common treatment sequence.
    CommonlyUsed,
    /// Same-category companion procedure.
    Related,
}

impl SuggestionKind {
    /// Priority assigned to entries of this kind.
    pub const fn default_priority(&self) -> i32 {
        match self {
            Self::Addition => 5,
            Self::CommonlyUsed => 4,
            Self::Related => 3,
        }
    }

    /// Tie-break rank among equal priorities (lower sorts first).
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Addition => 0,
            Self::CommonlyUsed => 1,
            Self::Related => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionEntry {
    pub code: String,
    pub name: String,
    pub points: u32,
    pub reason: String,
    pub kind: SuggestionKind,
    pub priority: i32,
    pub auto_add: bool,
}

/// Visit context for the point calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionContext {
    pub patient_age: Option<u32>,
    pub is_holiday: bool,
    pub is_overtime: bool,
    pub is_midnight: bool,
    pub is_home_visit: bool,
}

/// One follow-on step of a sequential pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextStep {
    pub keyword: String,
    #[serde(default)]
    pub exclude_keywords: Vec<String>,
    pub reason: String,
}

/// Treatment flow: when `trigger` matches the latest code name, propose `next_steps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequentialPattern {
    pub trigger: String,
    pub next_steps: Vec<NextStep>,
}

/// Same-category companions, keyed externally by the 3-character category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedPattern {
    pub keywords: Vec<String>,
    pub reason: String,
    #[serde(default)]
    pub exclude_keywords: Vec<String>,
}
