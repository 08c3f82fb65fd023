//! Form submissions and the sparse cell patches built from them.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ModelError;

/// Sparse row update: only the columns a stage form touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatchRequest {
    /// 1-based sheet row to update.
    pub row_index: usize,
    /// Zero-based column index to new cell value.
    pub fields: BTreeMap<usize, String>,
}

impl PatchRequest {
    #[must_use]
    pub fn new(row_index: usize) -> Self {
        Self {
            row_index,
            fields: BTreeMap::new(),
        }
    }

    /// The `rowData` payload: a JSON object keyed by column index.
    pub fn row_data(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.fields)
    }

    #[must_use]
    pub fn value_at(&self, column: usize) -> Option<&str> {
        self.fields.get(&column).map(String::as_str)
    }
}

/// A file attached to a stage form, uploaded before any row is patched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Document-link field that receives the uploaded URL.
    pub field: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// One `field=value` pair from a stage form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAssignment {
    pub field: String,
    pub value: Option<String>,
}

impl FromStr for FieldAssignment {
    type Err = ModelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (field, value) = raw
            .split_once('=')
            .ok_or_else(|| ModelError::InvalidAssignment(raw.to_string()))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(ModelError::InvalidAssignment(raw.to_string()));
        }
        Ok(Self {
            field: field.to_string(),
            value: Some(value.to_string()),
        })
    }
}

/// The edited values of one stage form.
///
/// A `None` or blank value means "leave the cell alone", never "clear it".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSubmission {
    pub values: Vec<FieldAssignment>,
    pub attachment: Option<Attachment>,
}

impl FormSubmission {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.push(FieldAssignment {
            field: field.into(),
            value: Some(value.into()),
        });
        self
    }

    #[must_use]
    pub fn with_untouched(mut self, field: impl Into<String>) -> Self {
        self.values.push(FieldAssignment {
            field: field.into(),
            value: None,
        });
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Values that carry content, in form order.
    pub fn edited(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().filter_map(|assignment| {
            assignment
                .value
                .as_deref()
                .filter(|value| !value.trim().is_empty())
                .map(|value| (assignment.field.as_str(), value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_assignment() {
        let parsed: FieldAssignment = "fdDate= 2024-02-10".parse().expect("parse");
        assert_eq!(parsed.field, "fdDate");
        assert_eq!(parsed.value.as_deref(), Some(" 2024-02-10"));

        let with_equals: FieldAssignment = "fdRemarks=a=b".parse().expect("parse");
        assert_eq!(with_equals.value.as_deref(), Some("a=b"));

        assert!("noequals".parse::<FieldAssignment>().is_err());
        assert!("=value".parse::<FieldAssignment>().is_err());
    }

    #[test]
    fn edited_skips_blank_and_untouched_values() {
        let form = FormSubmission::new()
            .with_value("fdDate", "2024-02-10")
            .with_value("fdRemarks", "   ")
            .with_untouched("fdMaterialAgeing");
        let edited: Vec<_> = form.edited().collect();
        assert_eq!(edited, vec![("fdDate", "2024-02-10")]);
    }

    #[test]
    fn row_data_is_keyed_by_column_index() {
        let mut patch = PatchRequest::new(9);
        patch.fields.insert(12, "2024/02/10 09:00:00".to_string());
        patch.fields.insert(3, "done".to_string());
        assert_eq!(
            patch.row_data().expect("serialize"),
            r#"{"3":"done","12":"2024/02/10 09:00:00"}"#
        );
    }
}
