//! Projection of raw sheet rows into stage records.

use pump_model::{Cell, HeaderMap, RawGrid, StageDefinition, StageRecord};

/// Projects every data row below the header into a [`StageRecord`].
///
/// Rows without a registration id are not beneficiaries (notes, totals,
/// trailing blank rows) and are skipped.
#[must_use]
pub fn project_records(
    grid: &RawGrid,
    map: &HeaderMap,
    stage: &StageDefinition,
) -> Vec<StageRecord> {
    let first_data_row = map.header_row() + 1;
    grid.rows()
        .enumerate()
        .skip(first_data_row)
        .filter_map(|(index, row)| project_row(row, index + 1, map, stage))
        .collect()
}

/// Projects one row; `sheet_row` is the row's 1-based position in the sheet.
///
/// Returns `None` when the registration id column is unresolved or blank.
#[must_use]
pub fn project_row(
    row: &[Cell],
    sheet_row: usize,
    map: &HeaderMap,
    stage: &StageDefinition,
) -> Option<StageRecord> {
    let reg_id = read_text(row, map.index_of("regId"))?;

    let fields = stage
        .projected
        .iter()
        .map(|field| {
            let value = read_text(row, map.index_of(field))
                .unwrap_or_else(|| stage.placeholder.to_string());
            ((*field).to_string(), value)
        })
        .collect();

    Some(StageRecord {
        row_index: sheet_row,
        reg_id,
        fields,
        planned: read_text(row, map.index_of(stage.planned_field)).unwrap_or_default(),
        actual: read_text(row, map.index_of(stage.actual_field)).unwrap_or_default(),
    })
}

/// Trimmed cell text; `None` for unresolved columns, missing cells and blanks.
fn read_text(row: &[Cell], index: Option<usize>) -> Option<String> {
    let cell = row.get(index?)?;
    let text = cell.text();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
