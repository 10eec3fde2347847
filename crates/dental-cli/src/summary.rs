//! Table and JSON rendering of command results.

use anyhow::Result;
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use dental_model::{
    ClassificationOutcome, ClassificationSource, CompatibilityResult, DiseaseCheckResult,
    SuggestionEntry, SuggestionKind, TreatmentCode,
};
use dental_standards::CatalogReport;
use serde::Serialize;

/// Leading checksum characters shown in the file table.
const SHA_PREFIX: usize = 12;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_catalog_report(report: &CatalogReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }
    println!("Catalog: {} ({} files)", report.version, report.files.len());

    let mut files = Table::new();
    files.set_header(vec![
        header_cell("Role"),
        header_cell("Path"),
        header_cell("Kind"),
        header_cell("SHA-256"),
    ]);
    apply_table_style(&mut files);
    for file in &report.files {
        files.add_row(vec![
            Cell::new(&file.role).fg(Color::Blue),
            Cell::new(&file.path),
            Cell::new(&file.kind),
            dim_cell(file.sha256.get(..SHA_PREFIX).unwrap_or(&file.sha256)),
        ]);
    }
    println!("{files}");

    let counts = &report.counts;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Rule set"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (label, count) in [
        ("Treatment codes", counts.treatment_codes),
        ("Addition groups", counts.addition_groups),
        ("Codes with additions", counts.codes_with_additions),
        ("Inclusion rules", counts.inclusion_rules),
        ("Exclusion rules", counts.exclusion_rules),
        ("Companion rules", counts.companion_rules),
        ("Sequential patterns", counts.sequential_patterns),
        ("Related categories", counts.related_categories),
        ("Disease categories", counts.disease_categories),
        ("Classification mappings", counts.classification_mappings),
    ] {
        table.add_row(vec![Cell::new(label), count_cell(count)]);
    }
    println!("{table}");
    Ok(())
}

pub fn print_compatibility(result: &CompatibilityResult, json: bool) -> Result<()> {
    if json {
        return print_json(result);
    }
    if result.can_add {
        println!("OK: code can be added");
    } else {
        println!("BLOCKED: code cannot be added");
    }
    if !result.exclusion_errors.is_empty() || !result.inclusion_warnings.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Severity"), header_cell("Message")]);
        apply_table_style(&mut table);
        align_column(&mut table, 0, CellAlignment::Center);
        for message in &result.exclusion_errors {
            table.add_row(vec![Cell::new("ERROR").fg(Color::Red), Cell::new(message)]);
        }
        for message in &result.inclusion_warnings {
            table.add_row(vec![Cell::new("WARN").fg(Color::Yellow), Cell::new(message)]);
        }
        println!("{table}");
    }
    if let Some(reason) = &result.companion_reason {
        println!("Consider also: {} ({reason})", result.companions.join(", "));
    }
    Ok(())
}

pub fn print_additions(entries: &[SuggestionEntry], json: bool) -> Result<()> {
    if json {
        return print_json(entries);
    }
    if entries.is_empty() {
        println!("No surcharges apply.");
        return Ok(());
    }
    print_entries(entries);
    Ok(())
}

pub fn print_suggestions(entries: &[SuggestionEntry], json: bool) -> Result<()> {
    if json {
        return print_json(entries);
    }
    if entries.is_empty() {
        println!("No suggestions.");
        return Ok(());
    }
    print_entries(entries);
    Ok(())
}

fn print_entries(entries: &[SuggestionEntry]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Name"),
        header_cell("Points"),
        header_cell("Kind"),
        header_cell("Priority"),
        header_cell("Auto"),
        header_cell("Reason"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.code)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&entry.name),
            Cell::new(entry.points),
            kind_cell(entry.kind),
            Cell::new(entry.priority),
            if entry.auto_add {
                Cell::new("✓").fg(Color::Green)
            } else {
                dim_cell("-")
            },
            Cell::new(&entry.reason),
        ]);
    }
    println!("{table}");
}

pub fn print_disease_check(result: &DiseaseCheckResult, json: bool) -> Result<()> {
    if json {
        return print_json(result);
    }
    println!(
        "Diagnosis fit: {}",
        if result.is_valid { "no conflicts" } else { "conflicts found" }
    );
    let mut table = Table::new();
    table.set_header(vec![header_cell("Severity"), header_cell("Message")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for message in &result.errors {
        table.add_row(vec![Cell::new("ERROR").fg(Color::Red), Cell::new(message)]);
    }
    for message in &result.warnings {
        table.add_row(vec![Cell::new("WARN").fg(Color::Yellow), Cell::new(message)]);
    }
    for message in &result.suggestions {
        table.add_row(vec![Cell::new("HINT").fg(Color::Cyan), Cell::new(message)]);
    }
    if !(result.errors.is_empty() && result.warnings.is_empty() && result.suggestions.is_empty()) {
        println!("{table}");
    }
    Ok(())
}

pub fn print_classification(outcome: &ClassificationOutcome, json: bool) -> Result<()> {
    if json {
        return print_json(outcome);
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Item"),
        header_cell("Result"),
        header_cell("Source"),
        header_cell("Notes"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for (item, result) in &outcome.results {
        let result_cell = match result.result {
            Some(true) => Cell::new("yes")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            Some(false) => dim_cell("no"),
            None => Cell::new("staff").fg(Color::Yellow),
        };
        let source = match result.source {
            Some(ClassificationSource::Questionnaire) => "questionnaire",
            Some(ClassificationSource::RequiresStaffEvaluation) => "staff",
            None => "-",
        };
        table.add_row(vec![
            Cell::new(item)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            result_cell,
            Cell::new(source),
            Cell::new(result.notes.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn print_search(codes: &[&TreatmentCode], json: bool) -> Result<()> {
    if json {
        return print_json(codes);
    }
    if codes.is_empty() {
        println!("No matching treatment codes.");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Name"),
        header_cell("Points"),
        header_cell("Additions"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for code in codes {
        table.add_row(vec![
            Cell::new(&code.code).fg(Color::Blue),
            Cell::new(&code.name),
            Cell::new(code.base_points),
            count_cell(code.addition_rules.len()),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn kind_cell(kind: SuggestionKind) -> Cell {
    match kind {
        SuggestionKind::Addition => Cell::new("addition").fg(Color::Magenta),
        SuggestionKind::CommonlyUsed => Cell::new("commonly used").fg(Color::Green),
        SuggestionKind::Related => Cell::new("related"),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
