#![deny(unsafe_code)]

use std::path::Path;

use dental_model::{ClassificationMapping, ConditionOperator, MatchingCondition};

use super::{get_field, get_optional, read_rows};
use crate::error::CatalogError;

/// Load classification mapping rows.
///
/// Columns: `classification_item,section_name,question_text,operator,value,priority`.
/// `value` is read as JSON when it parses, otherwise as a plain string.
/// Rows are returned in file order.
pub fn load_classification_mappings(
    path: &Path,
) -> Result<Vec<ClassificationMapping>, CatalogError> {
    let rows = read_rows(path)?;
    let mut mappings = Vec::with_capacity(rows.len());

    for row in &rows {
        let line = row.line;
        let item = get_field(row, "classification_item");
        if item.is_empty() {
            return Err(CatalogError::invalid_rule(
                path,
                format!("line {line}: empty classification_item"),
            ));
        }
        let priority = match get_optional(row, "priority") {
            Some(raw) => raw.parse::<i32>().map_err(|e| {
                CatalogError::invalid_rule(path, format!("line {line}: priority: {e}"))
            })?,
            None => 0,
        };

        mappings.push(ClassificationMapping {
            classification_item: item.to_string(),
            section_name: get_field(row, "section_name").to_string(),
            question_text: get_field(row, "question_text").to_string(),
            matching_condition: MatchingCondition {
                operator: ConditionOperator::from(get_field(row, "operator").to_string()),
                value: parse_value(get_field(row, "value")),
            },
            priority,
        });
    }

    Ok(mappings)
}

fn parse_value(raw: &str) -> serde_json::Value {
    if raw.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_falls_back_to_string() {
        assert_eq!(parse_value("はい"), serde_json::json!("はい"));
        assert_eq!(parse_value("\"yes\""), serde_json::json!("yes"));
        assert_eq!(parse_value("3"), serde_json::json!(3));
        assert_eq!(parse_value(""), serde_json::Value::Null);
    }
}
