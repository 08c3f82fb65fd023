//! One stage's working view of the sheet.

use chrono::NaiveDateTime;
use tracing::{Instrument, info_span};

use pump_gateway::{GatewayError, SheetGateway};
use pump_map::{MapError, map_stage_columns};
use pump_model::{FormSubmission, HeaderMap, RawGrid, StageBucket, StageDefinition, StageRecord};

use crate::classifier::partition;
use crate::error::SubmitError;
use crate::projector::project_records;
use crate::submit::{SubmitReport, submit_stage};

/// Column map and buckets derived from a single fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageView {
    /// `None` when the header row could not be located.
    pub header_map: Option<HeaderMap>,
    pub bucket: StageBucket,
    /// Rows in the grid this view was built from.
    pub sheet_rows: usize,
}

impl StageView {
    /// Builds a view from a freshly fetched grid.
    ///
    /// A sheet without a detectable header produces an empty view rather than
    /// an error.
    #[must_use]
    pub fn from_grid(grid: &RawGrid, stage: &StageDefinition) -> Self {
        match map_stage_columns(grid, stage) {
            Ok(map) => {
                let records = project_records(grid, &map, stage);
                Self {
                    bucket: partition(records),
                    header_map: Some(map),
                    sheet_rows: grid.len(),
                }
            }
            Err(MapError::HeaderNotFound { scanned }) => {
                tracing::warn!(stage = stage.key, scanned, "header row not found, showing no records");
                Self {
                    header_map: None,
                    bucket: StageBucket::default(),
                    sheet_rows: grid.len(),
                }
            }
        }
    }
}

/// Pending records picked by registration id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub records: Vec<StageRecord>,
    /// Requested ids with no pending record.
    pub missing: Vec<String>,
}

/// A stage page session: the stage definition and the last successful view.
#[derive(Debug, Clone)]
pub struct StageBoard {
    stage: StageDefinition,
    view: StageView,
}

impl StageBoard {
    #[must_use]
    pub fn new(stage: StageDefinition) -> Self {
        Self {
            stage,
            view: StageView::default(),
        }
    }

    #[must_use]
    pub fn stage(&self) -> &StageDefinition {
        &self.stage
    }

    #[must_use]
    pub fn view(&self) -> &StageView {
        &self.view
    }

    /// Re-reads the sheet and rebuilds the view from scratch.
    ///
    /// If the read fails the previous view is kept as it was.
    pub async fn refresh<G>(&mut self, gateway: &G) -> Result<&StageView, GatewayError>
    where
        G: SheetGateway,
    {
        let span = info_span!("refresh", stage = self.stage.key);
        let grid = match gateway.read().instrument(span.clone()).await {
            Ok(grid) => grid,
            Err(err) => {
                span.in_scope(|| {
                    tracing::error!(error = %err, "sheet read failed, keeping previous view");
                });
                return Err(err);
            }
        };
        let view = span.in_scope(|| StageView::from_grid(&grid, &self.stage));
        tracing::info!(
            stage = self.stage.key,
            pending = view.bucket.pending.len(),
            history = view.bucket.history.len(),
            "stage view refreshed"
        );
        self.view = view;
        Ok(&self.view)
    }

    /// Picks pending records by registration id, in request order.
    #[must_use]
    pub fn select(&self, reg_ids: &[String]) -> Selection {
        let mut selection = Selection::default();
        for reg_id in reg_ids {
            let reg_id = reg_id.trim();
            if selection.records.iter().any(|record| record.reg_id == reg_id) {
                continue;
            }
            match self.view.bucket.pending_by_reg_id(reg_id) {
                Some(record) => selection.records.push(record.clone()),
                None => selection.missing.push(reg_id.to_string()),
            }
        }
        selection
    }

    /// Submits `form` for `records` against the current view's column map.
    pub async fn submit<G>(
        &self,
        gateway: &G,
        records: &[StageRecord],
        form: &FormSubmission,
        completed_at: NaiveDateTime,
    ) -> Result<SubmitReport, SubmitError>
    where
        G: SheetGateway,
    {
        let map = self
            .view
            .header_map
            .as_ref()
            .ok_or(SubmitError::HeaderNotFound)?;
        submit_stage(gateway, &self.stage, map, records, form, completed_at).await
    }
}

/// Records whose id, name, village or mobile contains `query` (case-insensitive).
#[must_use]
pub fn filter_records<'a>(records: &'a [StageRecord], query: &str) -> Vec<&'a StageRecord> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| {
            [
                record.reg_id.as_str(),
                record.get("beneficiaryName"),
                record.get("village"),
                record.get("mobile"),
            ]
            .iter()
            .any(|value| value.to_lowercase().contains(&query))
        })
        .collect()
}
