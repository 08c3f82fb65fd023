//! Single and bulk stage submissions.
//!
//! A submission uploads the attachment (if any) exactly once, then sends one
//! sparse patch per selected record, all at the same time. The upload happens
//! before any row is touched, so a failed upload leaves the sheet unchanged.
//! Update failures are not rolled back: rows that succeeded stay advanced and
//! the failed ones remain pending for the operator to select again.

use chrono::NaiveDateTime;
use futures_util::future::join_all;
use tracing::{Instrument, info_span};

use pump_gateway::SheetGateway;
use pump_model::{FormSubmission, HeaderMap, StageDefinition, StageRecord};

use crate::error::{RowFailure, SubmitError};
use crate::patch::{build_patch, validate_form};

/// Result of a fully successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    /// Rows updated, as `(reg_id, row_index)`.
    pub updated: Vec<(String, usize)>,
    /// URL of the uploaded document, if the form carried one.
    pub document_url: Option<String>,
}

/// Submits `form` for every record in `records`.
///
/// Succeeds only if every row update succeeds; otherwise returns
/// [`SubmitError::PartialBulkFailure`] listing the rows that failed.
pub async fn submit_stage<G>(
    gateway: &G,
    stage: &StageDefinition,
    map: &HeaderMap,
    records: &[StageRecord],
    form: &FormSubmission,
    completed_at: NaiveDateTime,
) -> Result<SubmitReport, SubmitError>
where
    G: SheetGateway,
{
    if records.is_empty() {
        return Err(SubmitError::NothingSelected);
    }
    validate_form(map, stage, form)?;

    let span = info_span!("submit", stage = stage.key, rows = records.len());
    send_patches(gateway, stage, map, records, form, completed_at)
        .instrument(span)
        .await
}

async fn send_patches<G>(
    gateway: &G,
    stage: &StageDefinition,
    map: &HeaderMap,
    records: &[StageRecord],
    form: &FormSubmission,
    completed_at: NaiveDateTime,
) -> Result<SubmitReport, SubmitError>
where
    G: SheetGateway,
{
    let document_url = match &form.attachment {
        Some(attachment) => Some(
            gateway
                .upload_file(attachment)
                .await
                .map_err(SubmitError::UploadFailed)?,
        ),
        None => None,
    };

    let patches = records
        .iter()
        .map(|record| {
            build_patch(
                map,
                stage,
                record.row_index,
                form,
                document_url.as_deref(),
                completed_at,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let results = join_all(patches.iter().map(|patch| gateway.update(patch))).await;

    let mut updated = Vec::new();
    let mut failures = Vec::new();
    for (record, result) in records.iter().zip(results) {
        match result {
            Ok(()) => updated.push((record.reg_id.clone(), record.row_index)),
            Err(err) => {
                tracing::warn!(
                    reg_id = %record.reg_id,
                    row_index = record.row_index,
                    error = %err,
                    "row update failed"
                );
                failures.push(RowFailure {
                    reg_id: record.reg_id.clone(),
                    row_index: record.row_index,
                    message: err.to_string(),
                });
            }
        }
    }

    if failures.is_empty() {
        tracing::info!(updated = updated.len(), "submission complete");
        return Ok(SubmitReport {
            updated,
            document_url,
        });
    }
    tracing::error!(
        failed = failures.len(),
        total = records.len(),
        "submission partially failed"
    );
    Err(SubmitError::PartialBulkFailure {
        failed: failures.len(),
        total: records.len(),
        failures,
    })
}
