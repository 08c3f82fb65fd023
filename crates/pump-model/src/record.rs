//! Projected stage records and their pending/history buckets.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// One beneficiary row projected for a single stage.
///
/// Records are rebuilt from scratch on every fetch; `row_index` is only valid
/// against the grid the record came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageRecord {
    /// 1-based sheet row, the target of an update.
    pub row_index: usize,
    pub reg_id: String,
    pub fields: BTreeMap<String, String>,
    /// Trimmed `plannedN` value.
    pub planned: String,
    /// Trimmed `actualN` value.
    pub actual: String,
}

impl StageRecord {
    /// Projected value of `field`, or `""` when the stage does not project it.
    #[must_use]
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map_or("", String::as_str)
    }
}

/// Position of a record relative to one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Planned for this stage, not yet completed.
    Pending,
    /// Completed; terminal for this stage.
    Done,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Done => f.write_str("done"),
        }
    }
}

/// Records split into the stage's two views.
///
/// Records that have not reached the stage (both sentinels blank) appear in
/// neither list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageBucket {
    pub pending: Vec<StageRecord>,
    pub history: Vec<StageRecord>,
}

impl StageBucket {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.history.is_empty()
    }

    #[must_use]
    pub fn pending_by_reg_id(&self, reg_id: &str) -> Option<&StageRecord> {
        self.pending.iter().find(|record| record.reg_id == reg_id)
    }

    #[must_use]
    pub fn history_by_reg_id(&self, reg_id: &str) -> Option<&StageRecord> {
        self.history.iter().find(|record| record.reg_id == reg_id)
    }
}
