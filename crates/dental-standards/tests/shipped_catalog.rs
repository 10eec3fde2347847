//! Smoke test over the catalog shipped in `standards/`.

use std::path::PathBuf;

use dental_standards::RuleCatalog;

fn shipped_catalog_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}

#[test]
fn shipped_catalog_verifies() {
    let (catalog, summary) =
        RuleCatalog::verify_and_load(&shipped_catalog_dir()).expect("shipped catalog loads");

    assert_eq!(summary.file_count, 6);
    assert!(!catalog.is_empty());
    assert!(summary.counts.exclusion_rules >= 2);
    assert!(summary.counts.disease_categories >= 15);

    for category in ["309", "310", "313", "316"] {
        assert!(
            !catalog.related_patterns(category).is_empty(),
            "related patterns for {category}"
        );
    }

    let pulp = catalog.get("309000110").expect("pulpectomy");
    assert!(pulp.addition_rules.len() >= 6);
    assert!(catalog.matching_sequential(&pulp.name).is_some());
    assert!(!catalog.codes_matching("根管貼薬").is_empty());
}

#[test]
fn shipped_search_is_capped() {
    let (catalog, _) = RuleCatalog::verify_and_load(&shipped_catalog_dir()).unwrap();
    assert!(catalog.search("", None).len() <= dental_standards::SEARCH_LIMIT);
    let fillings = catalog.search("充填", Some("313"));
    assert!(fillings.iter().all(|code| code.category() == "313"));
    assert!(!fillings.is_empty());
}
