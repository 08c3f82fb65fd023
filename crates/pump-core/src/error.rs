//! Error types for the stage engine.

use thiserror::Error;

use pump_gateway::GatewayError;

/// Reasons a form cannot be turned into a patch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("field '{field}' is not part of the {stage} form")]
    FieldNotEditable { field: String, stage: &'static str },

    #[error("the {stage} form has no document field '{field}'")]
    NoDocumentField { field: String, stage: &'static str },

    #[error("no header matches the '{field}' column, the stage cannot be marked complete")]
    SentinelUnresolved { field: &'static str },

    #[error("no header matches the '{field}' document column, the upload would be lost")]
    DocumentUnresolved { field: String },
}

/// One row whose update failed during a bulk submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub reg_id: String,
    pub row_index: usize,
    pub message: String,
}

/// Errors from submitting a stage form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("no records selected")]
    NothingSelected,

    #[error("the sheet header could not be located, refresh before submitting")]
    HeaderNotFound,

    #[error(transparent)]
    Patch(#[from] PatchError),

    /// The document upload failed; no row was touched.
    #[error("upload failed: {0}")]
    UploadFailed(GatewayError),

    /// Some rows were updated and others were not. There is no rollback.
    #[error("{failed} of {total} updates failed")]
    PartialBulkFailure {
        failed: usize,
        total: usize,
        failures: Vec<RowFailure>,
    },
}

impl SubmitError {
    /// Rows that failed, for bulk failures; empty otherwise.
    #[must_use]
    pub fn failures(&self) -> &[RowFailure] {
        match self {
            Self::PartialBulkFailure { failures, .. } => failures,
            _ => &[],
        }
    }
}
