//! Logical field to column index mapping.

use std::collections::BTreeMap;

use serde::Serialize;

/// Logical field name to zero-based column index, built once per fetch.
///
/// Indices are only meaningful against the grid they were derived from. The
/// sheet layout can shift between fetches, so a map is never carried over to a
/// later grid; callers rebuild it on every read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderMap {
    header_row: usize,
    columns: BTreeMap<String, Option<usize>>,
}

impl HeaderMap {
    #[must_use]
    pub fn new(header_row: usize) -> Self {
        Self {
            header_row,
            columns: BTreeMap::new(),
        }
    }

    /// Records the resolution for `field`, replacing any earlier entry.
    pub fn insert(&mut self, field: impl Into<String>, index: Option<usize>) {
        self.columns.insert(field.into(), index);
    }

    /// Zero-based row index of the header row inside the source grid.
    #[must_use]
    pub fn header_row(&self) -> usize {
        self.header_row
    }

    /// Resolved column for `field`; `None` for unknown or unresolved fields.
    #[must_use]
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.columns.get(field).copied().flatten()
    }

    /// The sheet-script convention: the column index, or `-1` when unresolved.
    #[must_use]
    pub fn legacy_index(&self, field: &str) -> i64 {
        self.index_of(field)
            .and_then(|index| i64::try_from(index).ok())
            .unwrap_or(-1)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.columns.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<usize>)> {
        self.columns
            .iter()
            .map(|(field, index)| (field.as_str(), *index))
    }

    /// Fields that were looked up but matched no header.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|(_, index)| index.is_none())
            .map(|(field, _)| field.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
