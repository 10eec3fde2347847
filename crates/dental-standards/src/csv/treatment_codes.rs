#![deny(unsafe_code)]

use std::path::Path;

use chrono::NaiveDate;
use dental_model::TreatmentCode;

use super::{get_field, get_optional, read_rows};
use crate::error::CatalogError;

/// Parse `code,name,base_points,effective_from,effective_to` rows.
///
/// Addition rules are left empty; the catalog binds them afterwards.
pub fn parse_treatment_codes_csv(path: &Path) -> Result<Vec<TreatmentCode>, CatalogError> {
    let rows = read_rows(path)?;
    let mut codes = Vec::with_capacity(rows.len());

    for row in &rows {
        let line = row.line;
        let code = get_field(row, "code");
        if code.is_empty() {
            return Err(CatalogError::invalid_rule(
                path,
                format!("line {line}: empty treatment code"),
            ));
        }
        let name = get_field(row, "name");
        let base_points = get_field(row, "base_points").parse::<u32>().map_err(|e| {
            CatalogError::invalid_rule(path, format!("line {line}: base_points for {code}: {e}"))
        })?;
        let effective_from = parse_date(path, line, get_optional(row, "effective_from"))?;
        let effective_to = parse_date(path, line, get_optional(row, "effective_to"))?;
        if let (Some(from), Some(to)) = (effective_from, effective_to)
            && from > to
        {
            return Err(CatalogError::invalid_rule(
                path,
                format!("line {line}: effective_from {from} is after effective_to {to}"),
            ));
        }

        let mut treatment = TreatmentCode::new(code, name, base_points);
        treatment.effective_from = effective_from;
        treatment.effective_to = effective_to;
        codes.push(treatment);
    }

    Ok(codes)
}

fn parse_date(
    path: &Path,
    line: u64,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, CatalogError> {
    raw.map(|value| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
            CatalogError::invalid_rule(path, format!("line {line}: invalid date '{value}': {e}"))
        })
    })
    .transpose()
}
