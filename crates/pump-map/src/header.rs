//! Header row detection.

use std::collections::BTreeSet;

use pump_model::{RawGrid, normalize_header};

use crate::error::{MapError, Result};

/// Rows inspected before giving up on the search.
pub const HEADER_SCAN_LIMIT: usize = 10;

/// Required names that must appear in a row for it to count as the header.
pub const HEADER_MIN_MATCHES: usize = 2;

/// Header row of the Project Main sheet: five rows of title and metadata
/// precede it.
pub const CANONICAL_HEADER_ROW: usize = 5;

/// Names that identify the header row of every stage.
pub const DEFAULT_REQUIRED_HEADERS: &[&str] = &["regid", "beneficiaryname", "village"];

/// Finds the zero-based index of the header row.
///
/// The first of the first [`HEADER_SCAN_LIMIT`] rows containing at least
/// [`HEADER_MIN_MATCHES`] of `required` (compared as lowercase, whitespace-free
/// cell text) wins. If no row qualifies and the grid is long enough, the
/// sheet's canonical row [`CANONICAL_HEADER_ROW`] is used instead.
pub fn locate_header(grid: &RawGrid, required: &[&str]) -> Result<usize> {
    let wanted: BTreeSet<String> = required
        .iter()
        .map(|name| normalize_header(name))
        .filter(|name| !name.is_empty())
        .collect();
    let min_matches = HEADER_MIN_MATCHES.min(wanted.len());

    if min_matches > 0 {
        for (index, row) in grid.rows().take(HEADER_SCAN_LIMIT).enumerate() {
            let present: BTreeSet<String> = row
                .iter()
                .map(|cell| normalize_header(&cell.text()))
                .filter(|text| wanted.contains(text))
                .collect();
            if present.len() >= min_matches {
                tracing::debug!(header_row = index, matched = present.len(), "header row found");
                return Ok(index);
            }
        }
    }

    if grid.len() > CANONICAL_HEADER_ROW {
        tracing::warn!(
            header_row = CANONICAL_HEADER_ROW,
            "header search failed, using canonical header row"
        );
        return Ok(CANONICAL_HEADER_ROW);
    }

    Err(MapError::HeaderNotFound {
        scanned: grid.len().min(HEADER_SCAN_LIMIT),
    })
}

/// Normalized header cells of `row`. Missing rows yield no cells.
#[must_use]
pub fn header_cells(grid: &RawGrid, row: usize) -> Vec<String> {
    grid.row(row)
        .map(|cells| {
            cells
                .iter()
                .map(|cell| normalize_header(&cell.text()))
                .collect()
        })
        .unwrap_or_default()
}
