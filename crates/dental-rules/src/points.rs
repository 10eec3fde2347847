//! Conditional point surcharges for one treatment code.

use std::collections::HashMap;

use dental_model::{
    AdditionContext, AdditionKind, AdditionRule, AgeSubtype, SuggestionEntry, SuggestionKind,
    TimeSubtype, TreatmentCode, VisitSubtype,
};
use tracing::trace;

/// Every addition rule of `code` that fires under `context`, one entry per
/// rule, in rule order. Entries are never summed.
pub fn calculate_additions(
    code: &TreatmentCode,
    context: &AdditionContext,
) -> Vec<SuggestionEntry> {
    let mut entries = Vec::new();
    let mut tag_counts: HashMap<&'static str, usize> = HashMap::new();

    for rule in &code.addition_rules {
        let Some(trigger) = trigger_text(rule.kind, context) else {
            continue;
        };
        let tag = rule.kind.tag();
        let count = tag_counts.entry(tag).or_default();
        *count += 1;
        let synthetic = if *count == 1 {
            format!("{}_{tag}_add", code.code)
        } else {
            format!("{}_{tag}_add_{count}", code.code)
        };
        trace!(code = %code.code, %synthetic, rate = rule.rate, "addition fires");

        entries.push(SuggestionEntry {
            code: synthetic,
            name: format!("{} - {}", code.name, rule.description),
            points: surcharge_points(code.base_points, rule),
            reason: format!("{trigger}; surcharge +{}% applies", percent(rule.rate)),
            kind: SuggestionKind::Addition,
            priority: SuggestionKind::Addition.default_priority(),
            auto_add: matches!(rule.kind, AdditionKind::Age(_)),
        });
    }

    entries
}

/// Why the rule fires, or `None` when the context does not trigger it.
fn trigger_text(kind: AdditionKind, context: &AdditionContext) -> Option<String> {
    match kind {
        AdditionKind::Age(AgeSubtype::Under6Infant) => context
            .patient_age
            .filter(|age| *age < 6)
            .map(|age| format!("patient is {age} years old (under 6)")),
        // Needs staff judgement; there is no context flag for it.
        AdditionKind::Age(AgeSubtype::DifficultPatient) => None,
        AdditionKind::Time(TimeSubtype::Holiday) => {
            context.is_holiday.then(|| "holiday visit".to_string())
        }
        AdditionKind::Time(TimeSubtype::Overtime) => {
            context.is_overtime.then(|| "after-hours visit".to_string())
        }
        AdditionKind::Time(TimeSubtype::Midnight) => {
            context.is_midnight.then(|| "late-night visit".to_string())
        }
        AdditionKind::Visit(VisitSubtype::HomeVisit) => {
            context.is_home_visit.then(|| "home visit".to_string())
        }
    }
}

/// Share of one rate unit in basis points.
const BASIS_POINTS: u64 = 10_000;

/// `base * rate` rounded half up.
///
/// The rate is snapped to basis points first so the product is exact;
/// `45 * 0.7` in floating point lands just under 31.5.
fn surcharge_points(base_points: u32, rule: &AdditionRule) -> u32 {
    let rate_bp = (rule.rate * BASIS_POINTS as f64).round() as u64;
    let points = (u64::from(base_points) * rate_bp + BASIS_POINTS / 2) / BASIS_POINTS;
    u32::try_from(points).unwrap_or(u32::MAX)
}

fn percent(rate: f64) -> i64 {
    (rate * 100.0).round() as i64
}
