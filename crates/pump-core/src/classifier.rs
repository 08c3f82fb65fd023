//! Pending/history classification from a stage's sentinel pair.
//!
//! `actualN` is checked first: a completion timestamp makes the record done
//! whatever `plannedN` says. Without one, a planned date makes it pending.
//! With neither, the record has not reached the stage and belongs to no view.

use pump_model::{StageBucket, StageRecord, StageStatus};

/// Classifies a pair of raw sentinel values.
#[must_use]
pub fn classify_sentinels(planned: &str, actual: &str) -> Option<StageStatus> {
    if !actual.trim().is_empty() {
        Some(StageStatus::Done)
    } else if !planned.trim().is_empty() {
        Some(StageStatus::Pending)
    } else {
        None
    }
}

/// Classifies one record for the stage it was projected for.
#[must_use]
pub fn classify(record: &StageRecord) -> Option<StageStatus> {
    classify_sentinels(&record.planned, &record.actual)
}

/// Splits records into pending and history, dropping unclassified ones.
#[must_use]
pub fn partition<I>(records: I) -> StageBucket
where
    I: IntoIterator<Item = StageRecord>,
{
    let mut bucket = StageBucket::default();
    let mut unreached = 0usize;
    for record in records {
        match classify(&record) {
            Some(StageStatus::Pending) => bucket.pending.push(record),
            Some(StageStatus::Done) => bucket.history.push(record),
            None => unreached += 1,
        }
    }
    tracing::debug!(
        pending = bucket.pending.len(),
        history = bucket.history.len(),
        unreached,
        "records classified"
    );
    bucket
}
