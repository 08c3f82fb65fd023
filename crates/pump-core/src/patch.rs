//! Sparse patch construction for stage submissions.

use chrono::NaiveDateTime;

use pump_model::{FormSubmission, HeaderMap, PatchRequest, StageDefinition, TIMESTAMP_FORMAT};

use crate::error::PatchError;

/// Renders a completion timestamp the way it is stored in `actualN` columns.
#[must_use]
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Checks a form against the stage before anything is sent.
///
/// Every field must be one the stage form may write. An attachment must
/// target the stage's document field and that column must be resolved, so an
/// upload never happens without a cell to hold its link. The stage's `actualN`
/// column must be resolved (otherwise the row could never leave the pending
/// view).
pub fn validate_form(
    map: &HeaderMap,
    stage: &StageDefinition,
    form: &FormSubmission,
) -> Result<(), PatchError> {
    for assignment in &form.values {
        if !stage.is_editable(&assignment.field) {
            return Err(PatchError::FieldNotEditable {
                field: assignment.field.clone(),
                stage: stage.key,
            });
        }
    }
    if let Some(attachment) = &form.attachment {
        if stage.document_field != Some(attachment.field.as_str()) {
            return Err(PatchError::NoDocumentField {
                field: attachment.field.clone(),
                stage: stage.key,
            });
        }
        if map.index_of(&attachment.field).is_none() {
            return Err(PatchError::DocumentUnresolved {
                field: attachment.field.clone(),
            });
        }
    }
    if map.index_of(stage.actual_field).is_none() {
        return Err(PatchError::SentinelUnresolved {
            field: stage.actual_field,
        });
    }
    Ok(())
}

/// Builds the patch for one row.
///
/// Only edited values with a resolved column are written; blank values leave
/// the existing cell untouched. `document_url` (the uploaded attachment) goes
/// into the attachment's field. The `actualN` column always receives the
/// completion timestamp.
pub fn build_patch(
    map: &HeaderMap,
    stage: &StageDefinition,
    row_index: usize,
    form: &FormSubmission,
    document_url: Option<&str>,
    completed_at: NaiveDateTime,
) -> Result<PatchRequest, PatchError> {
    validate_form(map, stage, form)?;
    let actual_column = map
        .index_of(stage.actual_field)
        .ok_or(PatchError::SentinelUnresolved {
            field: stage.actual_field,
        })?;

    let mut patch = PatchRequest::new(row_index);
    for (field, value) in form.edited() {
        match map.index_of(field) {
            Some(column) => {
                patch.fields.insert(column, value.to_string());
            }
            None => tracing::debug!(field, "skipping value for unresolved column"),
        }
    }

    let document = form
        .attachment
        .as_ref()
        .map(|attachment| attachment.field.as_str())
        .zip(document_url.filter(|url| !url.trim().is_empty()));
    if let Some((field, url)) = document {
        let column = map
            .index_of(field)
            .ok_or_else(|| PatchError::DocumentUnresolved {
                field: field.to_string(),
            })?;
        patch.fields.insert(column, url.to_string());
    }

    patch
        .fields
        .insert(actual_column, format_timestamp(completed_at));
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pump_model::Attachment;

    use super::*;
    use crate::stages::find_stage;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 10)
            .and_then(|date| date.and_hms_opt(9, 0, 0))
            .unwrap()
    }

    fn foundation_map() -> HeaderMap {
        let mut map = HeaderMap::new(5);
        map.insert("fdMaterialAgeing", Some(6));
        map.insert("fdDate", Some(7));
        map.insert("fdRemarks", None);
        map.insert("challanLink", Some(8));
        map.insert("actual3", Some(10));
        map
    }

    fn attachment(field: &str) -> Attachment {
        Attachment {
            field: field.to_string(),
            file_name: "challan.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            bytes: vec![0x25, 0x50],
        }
    }

    #[test]
    fn timestamp_uses_slash_format() {
        assert_eq!(format_timestamp(at()), "2024/02/10 09:00:00");
    }

    #[test]
    fn writes_only_edited_resolved_fields_and_timestamp() {
        let stage = find_stage("foundation").unwrap();
        let form = FormSubmission::new()
            .with_value("fdMaterialAgeing", "14 days")
            .with_value("fdDate", "")
            .with_value("fdRemarks", "poured")
            .with_untouched("challanLink");
        let patch = build_patch(&foundation_map(), stage, 9, &form, None, at()).unwrap();

        assert_eq!(patch.row_index, 9);
        assert_eq!(patch.fields.len(), 2);
        assert_eq!(patch.value_at(6), Some("14 days"));
        assert_eq!(patch.value_at(10), Some("2024/02/10 09:00:00"));
    }

    #[test]
    fn uploaded_url_fills_document_field() {
        let stage = find_stage("foundation").unwrap();
        let form = FormSubmission::new().with_attachment(attachment("challanLink"));
        let patch = build_patch(
            &foundation_map(),
            stage,
            9,
            &form,
            Some("https://drive.example/f/1"),
            at(),
        )
        .unwrap();
        assert_eq!(patch.value_at(8), Some("https://drive.example/f/1"));
    }

    #[test]
    fn unresolved_actual_column_is_an_error() {
        let stage = find_stage("foundation").unwrap();
        let mut map = foundation_map();
        map.insert("actual3", None);
        let err = build_patch(&map, stage, 9, &FormSubmission::new(), None, at()).unwrap_err();
        assert_eq!(err, PatchError::SentinelUnresolved { field: "actual3" });
    }

    #[test]
    fn fields_outside_the_stage_form_are_rejected() {
        let stage = find_stage("foundation").unwrap();
        let form = FormSubmission::new().with_value("actual3", "yesterday");
        assert!(matches!(
            build_patch(&foundation_map(), stage, 9, &form, None, at()),
            Err(PatchError::FieldNotEditable { .. })
        ));
        let form = FormSubmission::new().with_value("paymentAmount", "100");
        assert!(matches!(
            build_patch(&foundation_map(), stage, 9, &form, None, at()),
            Err(PatchError::FieldNotEditable { .. })
        ));
    }

    #[test]
    fn attachment_needs_a_resolved_document_column() {
        let stage = find_stage("foundation").unwrap();
        let mut map = foundation_map();
        map.insert("challanLink", None);
        let form = FormSubmission::new().with_attachment(attachment("challanLink"));
        let expected = PatchError::DocumentUnresolved {
            field: "challanLink".to_string(),
        };
        assert_eq!(validate_form(&map, stage, &form), Err(expected.clone()));
        assert_eq!(
            build_patch(&map, stage, 9, &form, Some("https://drive.example/f/1"), at()),
            Err(expected)
        );
    }

    #[test]
    fn attachment_must_target_document_field() {
        let stage = find_stage("foundation").unwrap();
        let form = FormSubmission::new().with_attachment(attachment("fdDate"));
        assert!(matches!(
            validate_form(&foundation_map(), stage, &form),
            Err(PatchError::NoDocumentField { .. })
        ));
    }
}
