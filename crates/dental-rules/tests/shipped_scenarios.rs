//! End-to-end runs of the evaluators over the shipped rule catalog.

mod common;

use dental_model::{
    AdditionContext, ClassificationItem, ClassificationMapping, ClassificationSource,
    CompatibilityResult, DiagnosisCode, QuestionDefinition, ResponseData, SuggestionEntry,
    TreatmentRef,
};
use dental_rules::{
    STAFF_EVALUATION_NOTE, check_disease_treatment_compatibility, evaluate_classification,
    sort_mappings, suggest_for_selection, validate_selection,
};
use insta::assert_snapshot;
use serde_json::json;

use common::{code, shipped_catalog};

fn render_suggestions(entries: &[SuggestionEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{} {:?} p{} {}pt auto={}",
                entry.code, entry.kind, entry.priority, entry.points, entry.auto_add
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_validation(result: &CompatibilityResult) -> String {
    let mut lines = vec![format!("can_add: {}", result.can_add)];
    lines.extend(result.exclusion_errors.iter().map(|m| format!("error: {m}")));
    lines.extend(result.inclusion_warnings.iter().map(|m| format!("warning: {m}")));
    if let Some(reason) = &result.companion_reason {
        lines.push(format!("companions: {} ({reason})", result.companions.join(", ")));
    }
    lines.join("\n")
}

#[test]
fn pulpectomy_for_infant_on_holiday() {
    let selection = vec![code("309000110")];
    let context = AdditionContext {
        patient_age: Some(4),
        is_holiday: true,
        ..AdditionContext::default()
    };
    let suggestions = suggest_for_selection(shipped_catalog(), &selection, &context);
    assert_snapshot!(render_suggestions(&suggestions), @r"
    309000110_age_add Addition p5 117pt auto=true
    309000110_holiday_add Addition p5 374pt auto=false
    309000110_holiday_add_2 Addition p5 187pt auto=false
    309000610 CommonlyUsed p4 32pt auto=false
    309000710 CommonlyUsed p4 40pt auto=false
    309000410 CommonlyUsed p4 160pt auto=false
    309000510 CommonlyUsed p4 310pt auto=false
    ");
}

#[test]
fn molar_extraction_on_home_visit() {
    let selection = vec![code("310000310")];
    let context = AdditionContext {
        is_home_visit: true,
        ..AdditionContext::default()
    };
    let suggestions = suggest_for_selection(shipped_catalog(), &selection, &context);
    assert_snapshot!(render_suggestions(&suggestions), @r"
    310000310_home_visit_add Addition p5 135pt auto=false
    310000410 CommonlyUsed p4 230pt auto=false
    310000510 CommonlyUsed p4 1080pt auto=false
    310000610 Related p3 180pt auto=false
    ");
}

#[test]
fn filling_follow_ons_skip_selected_codes() {
    let selection = vec![code("313000110"), code("313000210")];
    let suggestions =
        suggest_for_selection(shipped_catalog(), &selection, &AdditionContext::default());
    assert_snapshot!(render_suggestions(&suggestions), @r"
    313000610 CommonlyUsed p4 46pt auto=false
    313000710 CommonlyUsed p4 40pt auto=false
    ");
}

#[test]
fn scaling_after_root_planing_is_blocked() {
    let result = validate_selection(
        shipped_catalog(),
        &code("314000110"),
        &[code("314000210")],
    );
    assert_snapshot!(render_validation(&result), @r#"
    can_add: false
    error: "スケーリング" and "SRP（前歯）" cannot be billed in the same month: スケーリングとSRPは同月算定できません
    companions: 歯科衛生実地指導 (スケーリングには衛生指導が推奨されます)
    "#);
}

#[test]
fn cavity_preparation_is_bundled_into_filling() {
    let result = validate_selection(
        shipped_catalog(),
        &code("313000510"),
        &[code("313000210")],
    );
    assert_snapshot!(render_validation(&result), @r#"
    can_add: true
    warning: "窩洞形成（単純なもの）" is already covered by selected "充填１（単純なもの）": 形成は充填・修復処置に包括されています
    warning: "窩洞形成（単純なもの）" is already covered by selected "充填１（単純なもの）": 窩洞形成は充填処置に包括されています
    "#);
}

#[test]
fn pulpitis_flags_filling_and_extraction() {
    let diagnoses = vec![DiagnosisCode {
        code: "8846496".to_string(),
        name: "歯髄炎".to_string(),
        icd10_code: "K04.0".to_string(),
    }];
    let treatments: Vec<TreatmentRef> = ["313000210", "310000310"]
        .iter()
        .map(|id| {
            let treatment = code(id);
            TreatmentRef {
                code: treatment.code,
                name: treatment.name,
            }
        })
        .collect();

    let result = check_disease_treatment_compatibility(shipped_catalog(), &diagnoses, &treatments);

    assert!(!result.is_valid);
    assert_eq!(
        result.errors,
        vec!["\"充填１（単純なもの）\" is not normally indicated for \"歯髄炎\"".to_string()]
    );
    assert_eq!(
        result.warnings,
        vec!["\"抜歯（臼歯）\" for \"歯髄炎\" needs careful clinical judgement".to_string()]
    );
    assert_eq!(
        result.suggestions,
        vec!["\"歯髄炎\" is usually treated with 抜髄, 根管治療, 根管充填".to_string()]
    );
}

fn question(id: &str, section: &str, text: &str) -> QuestionDefinition {
    QuestionDefinition {
        id: id.to_string(),
        section_name: section.to_string(),
        question_text: text.to_string(),
    }
}

#[test]
fn questionnaire_classification() {
    let questions = vec![
        question("q1", "口腔機能", "口がいつも開いている"),
        question("q2", "習癖", "気になる癖"),
        question("q3", "発育", "歯の生え方で気になること"),
        question("q4", "食事", "食べるのが遅い"),
    ];
    let responses: ResponseData = [
        ("q1".to_string(), json!(["はい"])),
        ("q2".to_string(), json!("指しゃぶり")),
        ("q3".to_string(), json!("遅い")),
        ("q4".to_string(), json!("いいえ")),
    ]
    .into_iter()
    .collect();
    let mut mappings: Vec<ClassificationMapping> =
        shipped_catalog().classification_mappings().to_vec();
    sort_mappings(&mut mappings);

    let outcome = evaluate_classification(&responses, &mappings, &questions);

    let rendered = outcome
        .results
        .iter()
        .map(|(item, result)| {
            format!(
                "{item}: result={:?} source={:?} notes={}",
                result.result,
                result.source,
                result.notes.as_deref().unwrap_or("-")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    assert_snapshot!(rendered, @r"
    C-1: result=None source=None notes=requires staff clinical evaluation
    C-2: result=None source=None notes=requires staff clinical evaluation
    C-3: result=None source=None notes=requires staff clinical evaluation
    C-4: result=Some(true) source=Some(Questionnaire) notes=auto-evaluated: 口腔機能: 口がいつも開いている
    C-5: result=Some(false) source=None notes=-
    C-6: result=Some(true) source=Some(Questionnaire) notes=auto-evaluated: 習癖: 気になる癖
    C-7: result=None source=None notes=requires staff clinical evaluation
    C-8: result=Some(false) source=None notes=-
    C-9: result=None source=None notes=requires staff clinical evaluation
    C-10: result=Some(false) source=None notes=-
    C-11: result=Some(false) source=None notes=-
    C-12: result=None source=None notes=requires staff clinical evaluation
    C-13: result=None source=None notes=requires staff clinical evaluation
    C-14: result=Some(false) source=None notes=-
    C-16: result=Some(false) source=None notes=-
    C-17: result=Some(false) source=None notes=-
    ");

    let staff = &outcome.details[&ClassificationItem::new(7)];
    assert_eq!(staff.result, None);
    assert_eq!(staff.source, Some(ClassificationSource::RequiresStaffEvaluation));
    assert_eq!(staff.message.as_deref(), Some(STAFF_EVALUATION_NOTE));
    assert!(staff.matched_questions.is_empty());

    let matched = &outcome.details[&ClassificationItem::new(4)];
    assert_eq!(matched.result, Some(true));
    assert_eq!(matched.source, Some(ClassificationSource::Questionnaire));
    assert_eq!(matched.matched_questions, ["口腔機能: 口がいつも開いている"]);
    assert_eq!(matched.message, None);
    assert_eq!(
        outcome.details.keys().collect::<Vec<_>>(),
        outcome.results.keys().collect::<Vec<_>>()
    );
}
