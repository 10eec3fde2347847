//! Ranked follow-on suggestions for the most recently selected code.

use std::collections::HashSet;

use dental_model::{
    AdditionContext, SuggestionEntry, SuggestionKind, TreatmentCode, contains_any,
};
use dental_standards::RuleCatalog;
use tracing::{debug, trace};

use crate::points::calculate_additions;

/// Upper bound on the returned list.
pub const MAX_SUGGESTIONS: usize = 8;

/// Catalog matches considered per sequential step.
const SEQUENTIAL_PER_STEP: usize = 2;

/// Catalog matches considered per related keyword.
const RELATED_PER_KEYWORD: usize = 3;

/// Ordered, de-duplicated accumulator. First insertion of a code wins.
struct Merged<'a> {
    entries: Vec<SuggestionEntry>,
    seen: HashSet<String>,
    selected: HashSet<&'a str>,
}

impl<'a> Merged<'a> {
    fn new(selection: &'a [TreatmentCode]) -> Self {
        Self {
            entries: Vec::new(),
            seen: HashSet::new(),
            selected: selection.iter().map(|code| code.code.as_str()).collect(),
        }
    }

    fn push(&mut self, entry: SuggestionEntry) {
        if self.selected.contains(entry.code.as_str()) || self.seen.contains(&entry.code) {
            trace!(code = %entry.code, "skipping duplicate suggestion");
            return;
        }
        self.seen.insert(entry.code.clone());
        self.entries.push(entry);
    }

    fn finish(mut self) -> Vec<SuggestionEntry> {
        // Stable: equal keys keep merge order.
        self.entries.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.kind.rank().cmp(&b.kind.rank()))
        });
        self.entries.truncate(MAX_SUGGESTIONS);
        self.entries
    }
}

/// Catalog codes named like `keyword`, skipping `trigger` itself. The first
/// `limit` matches are taken before the exclude filter applies.
fn lookup<'c>(
    catalog: &'c RuleCatalog,
    keyword: &str,
    trigger: &TreatmentCode,
    exclude_keywords: &[String],
    limit: usize,
) -> Vec<&'c TreatmentCode> {
    catalog
        .codes_matching(keyword)
        .into_iter()
        .filter(|code| code.code != trigger.code)
        .take(limit)
        .filter(|code| !contains_any(&code.name, exclude_keywords))
        .collect()
}

fn entry(code: &TreatmentCode, reason: &str, kind: SuggestionKind) -> SuggestionEntry {
    SuggestionEntry {
        code: code.code.clone(),
        name: code.name.clone(),
        points: code.base_points,
        reason: reason.to_string(),
        kind,
        priority: kind.default_priority(),
        auto_add: false,
    }
}

/// Propose follow-on codes for `selection.last()`.
///
/// `additions` (normally the point calculator's output for the same code)
/// are merged first, then sequential-pattern steps, then same-category
/// related codes. The result never contains a selected code or a duplicate,
/// is sorted by priority (ties: addition, commonly used, related, then merge
/// order) and holds at most [`MAX_SUGGESTIONS`] entries.
pub fn suggest_follow_ons(
    catalog: &RuleCatalog,
    selection: &[TreatmentCode],
    additions: &[SuggestionEntry],
) -> Vec<SuggestionEntry> {
    let Some(last) = selection.last() else {
        return Vec::new();
    };
    let mut merged = Merged::new(selection);

    for addition in additions {
        merged.push(addition.clone());
    }

    if let Some(pattern) = catalog.matching_sequential(&last.name) {
        trace!(trigger = %pattern.trigger, code = %last.code, "sequential pattern matched");
        for step in &pattern.next_steps {
            for code in lookup(
                catalog,
                &step.keyword,
                last,
                &step.exclude_keywords,
                SEQUENTIAL_PER_STEP,
            ) {
                merged.push(entry(code, &step.reason, SuggestionKind::CommonlyUsed));
            }
        }
    }

    for pattern in catalog.related_patterns(last.category()) {
        for keyword in &pattern.keywords {
            for code in lookup(
                catalog,
                keyword,
                last,
                &pattern.exclude_keywords,
                RELATED_PER_KEYWORD,
            ) {
                merged.push(entry(code, &pattern.reason, SuggestionKind::Related));
            }
        }
    }

    let suggestions = merged.finish();
    debug!(code = %last.code, count = suggestions.len(), "suggestions ranked");
    suggestions
}

/// Run the point calculator on `selection.last()` and rank follow-ons.
pub fn suggest_for_selection(
    catalog: &RuleCatalog,
    selection: &[TreatmentCode],
    context: &AdditionContext,
) -> Vec<SuggestionEntry> {
    let additions = selection
        .last()
        .map(|last| calculate_additions(last, context))
        .unwrap_or_default();
    suggest_follow_ons(catalog, selection, &additions)
}

#[cfg(test)]
mod tests {
    use dental_model::{NextStep, RelatedPattern, SequentialPattern};
    use dental_standards::RuleTables;

    use super::*;

    fn catalog() -> RuleCatalog {
        let codes = vec![
            TreatmentCode::new("309000110", "抜髄（単根管）", 234),
            TreatmentCode::new("309000610", "根管貼薬処置（単根管）", 32),
            TreatmentCode::new("309000710", "根管貼薬処置（２根管）", 40),
            TreatmentCode::new("309000720", "根管貼薬処置（３根管）", 48),
            TreatmentCode::new("309000910", "根管貼薬加算", 10),
            TreatmentCode::new("309000410", "感染根管処置", 160),
        ];
        let mut tables = RuleTables::default();
        tables.patterns.sequential.push(SequentialPattern {
            trigger: "抜髄".to_string(),
            next_steps: vec![NextStep {
                keyword: "根管貼薬".to_string(),
                exclude_keywords: vec!["加算".to_string()],
                reason: "after pulpectomy".to_string(),
            }],
        });
        tables.patterns.related.insert(
            "309".to_string(),
            vec![RelatedPattern {
                keywords: vec!["根管".to_string()],
                reason: "endodontic follow-up".to_string(),
                exclude_keywords: vec![],
            }],
        );
        RuleCatalog::new("t", codes, tables).unwrap()
    }

    #[test]
    fn empty_selection_yields_nothing() {
        assert!(suggest_follow_ons(&catalog(), &[], &[]).is_empty());
    }

    #[test]
    fn sequential_takes_two_then_filters() {
        let catalog = catalog();
        let selection = vec![catalog.get("309000110").unwrap().clone()];
        let suggestions = suggest_follow_ons(&catalog, &selection, &[]);

        let sequential: Vec<&str> = suggestions
            .iter()
            .filter(|s| s.kind == SuggestionKind::CommonlyUsed)
            .map(|s| s.code.as_str())
            .collect();
        assert_eq!(sequential, ["309000610", "309000710"]);

        let related: Vec<&str> = suggestions
            .iter()
            .filter(|s| s.kind == SuggestionKind::Related)
            .map(|s| s.code.as_str())
            .collect();
        // First three "根管" matches, minus codes already suggested.
        assert_eq!(related, ["309000410"]);
    }

    #[test]
    fn additions_rank_first_and_selected_codes_are_skipped() {
        let catalog = catalog();
        let selection = vec![
            catalog.get("309000610").unwrap().clone(),
            catalog.get("309000110").unwrap().clone(),
        ];
        let addition = SuggestionEntry {
            code: "309000110_age_add".to_string(),
            name: "抜髄（単根管） - infant".to_string(),
            points: 117,
            reason: "patient is 4 years old (under 6)".to_string(),
            kind: SuggestionKind::Addition,
            priority: 5,
            auto_add: true,
        };
        let suggestions = suggest_follow_ons(&catalog, &selection, &[addition]);
        assert_eq!(suggestions[0].code, "309000110_age_add");
        assert!(suggestions.iter().all(|s| s.code != "309000610"));
    }
}
