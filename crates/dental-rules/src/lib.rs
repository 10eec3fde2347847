#![deny(unsafe_code)]

//! Stateless rule evaluators over a [`RuleCatalog`](dental_standards::RuleCatalog).
//!
//! Every entry point is a pure function of its arguments: nothing is cached
//! between calls and no input shape makes an evaluator fail. Unknown codes,
//! categories and mapping rows are skipped.

pub mod classification;
pub mod compatibility;
pub mod disease;
pub mod points;
pub mod suggest;

pub use crate::classification::{
    STAFF_EVALUATION_NOTE, STAFF_ONLY_ITEMS, evaluate_classification, evaluate_condition,
    sort_mappings,
};
pub use crate::compatibility::{Finding, collect_findings, validate_selection};
pub use crate::disease::{
    NO_DIAGNOSIS_WARNING, NO_TREATMENT_WARNING, check_disease_treatment_compatibility,
};
pub use crate::points::calculate_additions;
pub use crate::suggest::{MAX_SUGGESTIONS, suggest_follow_ons, suggest_for_selection};
