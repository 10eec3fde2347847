//! Treatment codes and the typed billing rules attached to them.
//!
//! Rule rows arrive from the catalog files as loosely-shaped records; they are
//! converted into these types once at load time so the evaluators never have
//! to second-guess a missing field.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::text::leading_chars;

/// Number of leading code characters that form a treatment category.
pub const CATEGORY_LEN: usize = 3;

/// A billable treatment code from the fee schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentCode {
    /// Unique code identifier (e.g. "309000110").
    pub code: String,
    /// Display name; keyword rules match against this.
    pub name: String,
    /// Base point value under the fee schedule.
    pub base_points: u32,
    /// Conditional surcharges resolved for this code.
    #[serde(default)]
    pub addition_rules: Vec<AdditionRule>,
    /// First day the code may be billed (inclusive).
    #[serde(default)]
    pub effective_from: Option<NaiveDate>,
    /// Last day the code may be billed (inclusive).
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
}

impl TreatmentCode {
    pub fn new(code: impl Into<String>, name: impl Into<String>, base_points: u32) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            base_points,
            addition_rules: Vec::new(),
            effective_from: None,
            effective_to: None,
        }
    }

    #[must_use]
    pub fn with_addition_rules(mut self, rules: Vec<AdditionRule>) -> Self {
        self.addition_rules = rules;
        self
    }

    /// Category derived from the leading code characters.
    pub fn category(&self) -> &str {
        leading_chars(&self.code, CATEGORY_LEN)
    }

    /// Whether the code is billable on `date`. Missing bounds are open.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from.is_none_or(|from| from <= date)
            && self.effective_to.is_none_or(|to| date <= to)
    }
}

/// Patient-age surcharge subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeSubtype {
    Under6Infant,
    DifficultPatient,
}

/// Visit-timing surcharge subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSubtype {
    Holiday,
    Overtime,
    Midnight,
}

/// Visit-setting surcharge subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitSubtype {
    HomeVisit,
}

/// Tagged addition rule kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "subtype", rename_all = "snake_case")]
pub enum AdditionKind {
    Age(AgeSubtype),
    Time(TimeSubtype),
    Visit(VisitSubtype),
}

impl AdditionKind {
    /// Parse a `kind`/`subtype` pair as written in the catalog files.
    pub fn parse(kind: &str, subtype: &str) -> Result<Self, ModelError> {
        let parsed = match (
            kind.trim().to_lowercase().as_str(),
            subtype.trim().to_lowercase().as_str(),
        ) {
            ("age", "under_6_infant") => Some(Self::Age(AgeSubtype::Under6Infant)),
            ("age", "difficult_patient") => Some(Self::Age(AgeSubtype::DifficultPatient)),
            ("time", "holiday") => Some(Self::Time(TimeSubtype::Holiday)),
            ("time", "overtime") => Some(Self::Time(TimeSubtype::Overtime)),
            ("time", "midnight") => Some(Self::Time(TimeSubtype::Midnight)),
            ("visit", "home_visit") => Some(Self::Visit(VisitSubtype::HomeVisit)),
            _ => None,
        };
        parsed.ok_or_else(|| ModelError::UnknownAdditionRule {
            kind: kind.to_string(),
            subtype: subtype.to_string(),
        })
    }

    /// Tag used in synthetic suggestion codes (`<code>_<tag>_add`).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Age(AgeSubtype::Under6Infant) => "age",
            Self::Age(AgeSubtype::DifficultPatient) => "difficult_patient",
            Self::Time(TimeSubtype::Holiday) => "holiday",
            Self::Time(TimeSubtype::Overtime) => "overtime",
            Self::Time(TimeSubtype::Midnight) => "midnight",
            Self::Visit(VisitSubtype::HomeVisit) => "home_visit",
        }
    }
}

/// A conditional surcharge: `rate` is a fraction of the base points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionRule {
    pub kind: AdditionKind,
    pub rate: f64,
    #[serde(default)]
    pub description: String,
}

/// Treatment `keyword` is already paid for by any treatment named in `included_in`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionRule {
    pub keyword: String,
    pub included_in: Vec<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Billing window in which two treatments exclude each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionWindow {
    SameDay,
    SameMonth,
    Simultaneous,
}

impl ExclusionWindow {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SameDay => "on the same day",
            Self::SameMonth => "in the same month",
            Self::Simultaneous => "simultaneously",
        }
    }
}

/// Treatment `keyword` cannot be billed together with the listed treatments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub keyword: String,
    #[serde(default)]
    pub same_day: Vec<String>,
    #[serde(default)]
    pub same_month: Vec<String>,
    #[serde(default)]
    pub simultaneous: Vec<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl ExclusionRule {
    /// Excluded keyword sets, in fixed window order.
    pub fn windows(&self) -> [(ExclusionWindow, &[String]); 3] {
        [
            (ExclusionWindow::SameDay, self.same_day.as_slice()),
            (ExclusionWindow::SameMonth, self.same_month.as_slice()),
            (ExclusionWindow::Simultaneous, self.simultaneous.as_slice()),
        ]
    }

    /// Every excluded keyword across all windows.
    pub fn excluded_keywords(&self) -> impl Iterator<Item = &String> {
        self.same_day
            .iter()
            .chain(&self.same_month)
            .chain(&self.simultaneous)
    }
}

/// Treatments that usually accompany `keyword` (e.g. anaesthesia before a filling).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionRule {
    pub keyword: String,
    pub companions: Vec<String>,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_is_leading_three_chars() {
        let code = TreatmentCode::new("309000110", "抜髄（単根管）", 234);
        assert_eq!(code.category(), "309");
    }

    #[test]
    fn effective_window_is_inclusive() {
        let mut code = TreatmentCode::new("313000110", "充填１（単純なもの）", 106);
        code.effective_from = NaiveDate::from_ymd_opt(2024, 6, 1);
        code.effective_to = NaiveDate::from_ymd_opt(2026, 5, 31);
        assert!(!code.is_effective_on(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()));
        assert!(code.is_effective_on(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
        assert!(code.is_effective_on(NaiveDate::from_ymd_opt(2026, 5, 31).unwrap()));
        assert!(!code.is_effective_on(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()));
    }

    #[test]
    fn parses_addition_kinds() {
        assert_eq!(
            AdditionKind::parse("age", "under_6_infant"),
            Ok(AdditionKind::Age(AgeSubtype::Under6Infant))
        );
        assert_eq!(
            AdditionKind::parse("Time", " holiday "),
            Ok(AdditionKind::Time(TimeSubtype::Holiday))
        );
        assert!(AdditionKind::parse("time", "lunch").is_err());
    }

    #[test]
    fn addition_kind_serializes_tagged() {
        let rule = AdditionRule {
            kind: AdditionKind::Time(TimeSubtype::Midnight),
            rate: 0.8,
            description: String::new(),
        };
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["kind"]["kind"], "time");
        assert_eq!(value["kind"]["subtype"], "midnight");
    }
}
