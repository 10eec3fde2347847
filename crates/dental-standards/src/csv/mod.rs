//! CSV loaders for catalog files.

pub mod mappings;
pub mod treatment_codes;

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::CatalogError;

/// One CSV record keyed by trimmed header name.
#[derive(Debug, Clone)]
pub struct CsvRow {
    /// Line the record starts on, counting the header as line 1.
    pub line: u64,
    pub fields: BTreeMap<String, String>,
}

/// Read a CSV file into row maps.
///
/// Strips a leading BOM from the headers and trims every value.
pub fn read_rows(path: &Path) -> Result<Vec<CsvRow>, CatalogError> {
    let bytes = std::fs::read(path).map_err(|e| CatalogError::io(path, e))?;

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes.as_slice());
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CatalogError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| CatalogError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let line = record.position().map_or(0, ::csv::Position::line);
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.clone(), value.trim().to_string()))
            .collect();
        rows.push(CsvRow { line, fields });
    }
    Ok(rows)
}

/// Field value, empty when the column is missing.
pub fn get_field<'a>(row: &'a CsvRow, key: &str) -> &'a str {
    row.fields.get(key).map(String::as_str).unwrap_or("")
}

/// Field value, `None` when missing or empty.
pub fn get_optional<'a>(row: &'a CsvRow, key: &str) -> Option<&'a str> {
    row.fields.get(key).map(String::as_str).filter(|v| !v.is_empty())
}
