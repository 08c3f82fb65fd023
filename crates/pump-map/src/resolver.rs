//! Keyword-based column resolution.
//!
//! A header matches a keyword set when it contains every keyword as a
//! substring, in any order. Rules are resolved in declaration order so that a
//! rule marked `distinct_from` can steer away from columns already claimed by
//! earlier fields (two "Challan" headers, one logical field each). Headers
//! holding one of a rule's `excluding` keywords are never claimed by it.

use std::collections::BTreeSet;

use pump_model::{ColumnRule, HeaderMap, RawGrid, StageDefinition, normalize_header};

use crate::error::Result;
use crate::header::{header_cells, locate_header};

/// Index of the first header containing all `keywords`, or `None`.
///
/// `headers` must already be normalized; keywords are normalized here. Blank
/// keywords are ignored and an empty keyword set matches nothing.
#[must_use]
pub fn resolve_column(headers: &[String], keywords: &[&str]) -> Option<usize> {
    let keywords = normalize_keywords(keywords);
    find_column(headers, &keywords, &BTreeSet::new())
}

/// Resolves every rule against `headers`, in rule order.
#[must_use]
pub fn resolve_columns(headers: &[String], rules: &[ColumnRule], header_row: usize) -> HeaderMap {
    let mut map = HeaderMap::new(header_row);
    for rule in rules {
        let mut skip: BTreeSet<usize> = rule
            .distinct_from
            .iter()
            .filter_map(|field| map.index_of(field))
            .collect();
        let excluding = normalize_keywords(rule.excluding);
        skip.extend(
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| contains_any(header, &excluding))
                .map(|(index, _)| index),
        );
        let index = rule.alternatives.iter().find_map(|keywords| {
            let keywords = normalize_keywords(keywords);
            find_column(headers, &keywords, &skip)
        });
        match index {
            Some(column) => tracing::debug!(field = rule.field, column, "column resolved"),
            None => tracing::debug!(field = rule.field, "column unresolved"),
        }
        map.insert(rule.field, index);
    }
    map
}

/// Locates the header row of `grid` and resolves all of `stage`'s columns.
pub fn map_stage_columns(grid: &RawGrid, stage: &StageDefinition) -> Result<HeaderMap> {
    let header_row = locate_header(grid, stage.required_headers)?;
    let headers = header_cells(grid, header_row);
    let map = resolve_columns(&headers, &stage.rules, header_row);
    let unresolved = map.unresolved().count();
    if unresolved > 0 {
        tracing::debug!(stage = stage.key, unresolved, "some columns did not match any header");
    }
    Ok(map)
}

fn normalize_keywords(keywords: &[&str]) -> Vec<String> {
    keywords
        .iter()
        .map(|keyword| normalize_header(keyword))
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

fn contains_any(header: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|keyword| header.contains(keyword.as_str()))
}

fn find_column(headers: &[String], keywords: &[String], skip: &BTreeSet<usize>) -> Option<usize> {
    if keywords.is_empty() {
        return None;
    }
    headers.iter().enumerate().find_map(|(index, header)| {
        let matches = !skip.contains(&index)
            && keywords
                .iter()
                .all(|keyword| header.contains(keyword.as_str()));
        matches.then_some(index)
    })
}
