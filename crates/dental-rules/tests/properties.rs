mod common;

use std::collections::HashSet;

use dental_model::{
    AdditionContext, AdditionKind, AdditionRule, AgeSubtype, ExclusionRule, InclusionRule,
    TreatmentCode,
};
use dental_rules::{
    MAX_SUGGESTIONS, calculate_additions, suggest_for_selection, validate_selection,
};
use dental_standards::{RuleCatalog, RuleTables};
use proptest::prelude::*;

use common::shipped_catalog;

fn context() -> impl Strategy<Value = AdditionContext> {
    (
        prop::option::of(0u32..90),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(patient_age, is_holiday, is_overtime, is_midnight, is_home_visit)| AdditionContext {
                patient_age,
                is_holiday,
                is_overtime,
                is_midnight,
                is_home_visit,
            },
        )
}

fn exclusion_catalog(window: usize) -> RuleCatalog {
    let excluded = vec!["感染根管".to_string()];
    let mut rule = ExclusionRule {
        keyword: "抜髄".to_string(),
        ..ExclusionRule::default()
    };
    match window {
        0 => rule.same_day = excluded,
        1 => rule.same_month = excluded,
        _ => rule.simultaneous = excluded,
    }
    let mut tables = RuleTables::default();
    tables.billing.exclusion.push(rule);
    RuleCatalog::new("prop", Vec::new(), tables).unwrap()
}

fn inclusion_catalog() -> RuleCatalog {
    let mut tables = RuleTables::default();
    tables.billing.inclusion.push(InclusionRule {
        keyword: "根管貼薬".to_string(),
        included_in: vec!["抜髄".to_string()],
        explanation: None,
    });
    RuleCatalog::new("prop", Vec::new(), tables).unwrap()
}

proptest! {
    #[test]
    fn suggestions_are_bounded_unique_and_ranked(
        picks in prop::collection::vec(any::<usize>(), 0..5),
        ctx in context(),
    ) {
        let catalog = shipped_catalog();
        let selection: Vec<TreatmentCode> = picks
            .iter()
            .map(|pick| catalog.codes()[pick % catalog.len()].clone())
            .collect();

        let suggestions = suggest_for_selection(catalog, &selection, &ctx);

        prop_assert!(suggestions.len() <= MAX_SUGGESTIONS);
        let mut seen = HashSet::new();
        for entry in &suggestions {
            prop_assert!(seen.insert(entry.code.clone()), "duplicate {}", entry.code);
            prop_assert!(selection.iter().all(|selected| selected.code != entry.code));
        }
        for pair in suggestions.windows(2) {
            prop_assert!(
                pair[0].priority > pair[1].priority
                    || (pair[0].priority == pair[1].priority
                        && pair[0].kind.rank() <= pair[1].kind.rank())
            );
        }
        if selection.is_empty() {
            prop_assert!(suggestions.is_empty());
        }

        let again = suggest_for_selection(catalog, &selection, &ctx);
        prop_assert_eq!(
            serde_json::to_string(&suggestions).unwrap(),
            serde_json::to_string(&again).unwrap()
        );
    }

    #[test]
    fn exclusion_blocks_both_orders(
        before_a in "[a-z]{0,4}",
        after_a in "[a-z]{0,4}",
        before_b in "[a-z]{0,4}",
        after_b in "[a-z]{0,4}",
        window in 0usize..3,
    ) {
        let catalog = exclusion_catalog(window);
        let a = TreatmentCode::new("A", format!("{before_a}抜髄{after_a}"), 100);
        let b = TreatmentCode::new("B", format!("{before_b}感染根管{after_b}"), 100);

        let b_after_a = validate_selection(&catalog, &b, std::slice::from_ref(&a));
        let a_after_b = validate_selection(&catalog, &a, std::slice::from_ref(&b));
        for result in [&b_after_a, &a_after_b] {
            prop_assert!(!result.can_add);
            prop_assert!(
                result
                    .exclusion_errors
                    .iter()
                    .any(|message| message.contains(&a.name) && message.contains(&b.name))
            );
        }
    }

    #[test]
    fn inclusion_warns_both_orders_without_blocking(
        before_a in "[a-z]{0,4}",
        after_a in "[a-z]{0,4}",
        before_b in "[a-z]{0,4}",
        after_b in "[a-z]{0,4}",
    ) {
        let catalog = inclusion_catalog();
        // A is included in B.
        let a = TreatmentCode::new("A", format!("{before_a}根管貼薬{after_a}"), 32);
        let b = TreatmentCode::new("B", format!("{before_b}抜髄{after_b}"), 234);

        let forward = validate_selection(&catalog, &a, std::slice::from_ref(&b));
        prop_assert!(forward.can_add);
        prop_assert!(forward.inclusion_warnings.iter().any(|w| w.contains("already covered")));

        let reverse = validate_selection(&catalog, &b, std::slice::from_ref(&a));
        prop_assert!(reverse.can_add);
        prop_assert!(reverse.inclusion_warnings.iter().any(|w| w.contains("bundled into")));
    }

    #[test]
    fn infant_surcharge_is_rounded_share_of_base(base in 0u32..20_000, age in 0u32..120) {
        let code = TreatmentCode::new("313000210", "充填１", base).with_addition_rules(vec![
            AdditionRule {
                kind: AdditionKind::Age(AgeSubtype::Under6Infant),
                rate: 0.2,
                description: "infant".to_string(),
            },
        ]);
        let ctx = AdditionContext {
            patient_age: Some(age),
            ..AdditionContext::default()
        };
        let entries = calculate_additions(&code, &ctx);
        if age < 6 {
            prop_assert_eq!(entries.len(), 1);
            prop_assert_eq!(entries[0].points, (base * 2 + 5) / 10);
            prop_assert!(entries[0].auto_add);
        } else {
            prop_assert!(entries.is_empty());
        }
    }
}
