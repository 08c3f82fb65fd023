use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pump_core::{RowFailure, SubmitReport};
use pump_model::{HeaderMap, StageDefinition, StageRecord};

pub fn print_stages(stages: &[StageDefinition]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Key"),
        header_cell("Stage"),
        header_cell("Sentinels"),
        header_cell("Form fields"),
        header_cell("Document"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for stage in stages {
        table.add_row(vec![
            Cell::new(stage.number),
            Cell::new(stage.key).fg(Color::Cyan),
            Cell::new(stage.name),
            Cell::new(format!("{} / {}", stage.planned_field, stage.actual_field)),
            Cell::new(stage.editable.join(", ")),
            stage
                .document_field
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
}

pub fn print_columns(stage: &StageDefinition, map: &HeaderMap) {
    println!("{stage}: header on sheet row {}", map.header_row() + 1);
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Column")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for rule in &stage.rules {
        let index = map.legacy_index(rule.field);
        let column = if index < 0 {
            Cell::new(index).fg(Color::Red)
        } else {
            Cell::new(index)
        };
        table.add_row(vec![Cell::new(rule.field), column]);
    }
    println!("{table}");
}

/// Prints `records` with the stage's projected fields as columns.
pub fn print_records(stage: &StageDefinition, title: &str, records: &[&StageRecord]) {
    println!("{stage}: {} {title}", records.len());
    if records.is_empty() {
        return;
    }
    let mut table = Table::new();
    let mut header = vec![header_cell("Row")];
    header.extend(stage.projected.iter().map(|field| header_cell(field)));
    header.push(header_cell(stage.planned_field));
    header.push(header_cell(stage.actual_field));
    table.set_header(header);
    apply_records_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for record in records {
        let mut row = vec![dim_cell(record.row_index)];
        row.extend(stage.projected.iter().map(|field| Cell::new(record.get(field))));
        row.push(Cell::new(&record.planned));
        row.push(Cell::new(&record.actual).fg(Color::Green));
        table.add_row(row);
    }
    println!("{table}");
}

pub fn print_submit_report(report: &SubmitReport) {
    if let Some(url) = &report.document_url {
        println!("Document: {url}");
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Reg Id"),
        header_cell("Row"),
        header_cell("Result"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (reg_id, row_index) in &report.updated {
        table.add_row(vec![
            Cell::new(reg_id),
            Cell::new(row_index),
            Cell::new("updated").fg(Color::Green),
        ]);
    }
    println!("{table}");
}

pub fn print_failures(failures: &[RowFailure]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Reg Id"),
        header_cell("Row"),
        header_cell("Error"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for failure in failures {
        table.add_row(vec![
            Cell::new(&failure.reg_id),
            Cell::new(failure.row_index),
            Cell::new(&failure.message).fg(Color::Red),
        ]);
    }
    eprintln!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn apply_records_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .add_attribute(Attribute::Bold)
        .fg(Color::Cyan)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}
