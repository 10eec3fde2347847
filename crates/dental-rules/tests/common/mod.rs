use std::path::PathBuf;
use std::sync::OnceLock;

use dental_model::TreatmentCode;
use dental_standards::RuleCatalog;

pub fn shipped_catalog() -> &'static RuleCatalog {
    static CATALOG: OnceLock<RuleCatalog> = OnceLock::new();
    CATALOG.get_or_init(|| {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards");
        RuleCatalog::verify_and_load(&dir)
            .expect("shipped catalog loads")
            .0
    })
}

#[allow(dead_code)]
pub fn code(id: &str) -> TreatmentCode {
    shipped_catalog()
        .get(id)
        .unwrap_or_else(|| panic!("code {id} in shipped catalog"))
        .clone()
}
