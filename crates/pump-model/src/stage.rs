//! Stage definitions: the configuration that turns the generic engine into one
//! pipeline stage.

use std::fmt;

use serde::Serialize;

/// Normalizes header text and keywords for matching: trimmed, BOM-free,
/// lowercase, with every whitespace character removed (`"Reg Id"` -> `"regid"`).
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .to_lowercase()
        .split_whitespace()
        .collect()
}

/// Declarative matching policy for one logical field.
///
/// `alternatives` are tried in order; the first keyword set for which some
/// header contains every keyword wins. A header containing any of the
/// `excluding` keywords is never claimed. `distinct_from` names fields resolved
/// earlier whose columns this field must not claim again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnRule {
    pub field: &'static str,
    pub alternatives: &'static [&'static [&'static str]],
    pub excluding: &'static [&'static str],
    pub distinct_from: &'static [&'static str],
}

impl ColumnRule {
    #[must_use]
    pub const fn new(field: &'static str, alternatives: &'static [&'static [&'static str]]) -> Self {
        Self {
            field,
            alternatives,
            excluding: &[],
            distinct_from: &[],
        }
    }

    #[must_use]
    pub const fn excluding(mut self, keywords: &'static [&'static str]) -> Self {
        self.excluding = keywords;
        self
    }

    #[must_use]
    pub const fn distinct_from(mut self, fields: &'static [&'static str]) -> Self {
        self.distinct_from = fields;
        self
    }
}

/// One sentinel-driven pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageDefinition {
    /// Sentinel pair number (`planned3` / `actual3` for stage 3).
    pub number: u8,
    /// Stable command-line key, e.g. `"foundation"`.
    pub key: &'static str,
    /// Display name, e.g. `"Foundation"`.
    pub name: &'static str,
    /// Value shown for fields without a resolved column or cell.
    pub placeholder: &'static str,
    /// Normalized header names used to locate the header row.
    pub required_headers: &'static [&'static str],
    /// Resolution rules in resolution order.
    pub rules: Vec<ColumnRule>,
    /// Fields projected into each record, in display order.
    pub projected: Vec<&'static str>,
    /// Fields the stage form may write.
    pub editable: Vec<&'static str>,
    /// Field that receives the uploaded document URL, if the form takes a file.
    pub document_field: Option<&'static str>,
    pub planned_field: &'static str,
    pub actual_field: &'static str,
}

impl StageDefinition {
    /// Rule for `field`, if the stage resolves it.
    #[must_use]
    pub fn rule(&self, field: &str) -> Option<&ColumnRule> {
        self.rules.iter().find(|rule| rule.field == field)
    }

    /// True when the stage form is allowed to write `field`.
    #[must_use]
    pub fn is_editable(&self, field: &str) -> bool {
        self.editable.contains(&field) || self.document_field == Some(field)
    }

    /// Matches the key, the stage number or the display name (case-insensitive).
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        self.key.eq_ignore_ascii_case(query)
            || self.name.eq_ignore_ascii_case(query)
            || query.parse::<u8>().is_ok_and(|number| number == self.number)
    }
}

impl fmt::Display for StageDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (stage {})", self.name, self.number)
    }
}
