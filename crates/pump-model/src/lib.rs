//! Data model shared by the pump tracker crates.
//!
//! The sheet is an untyped grid ([`RawGrid`]). A stage locates its header row,
//! resolves logical fields to columns ([`HeaderMap`]), projects rows into
//! [`StageRecord`]s, buckets them ([`StageBucket`]) and writes back sparse
//! [`PatchRequest`]s.

pub mod error;
pub mod grid;
pub mod header;
pub mod patch;
pub mod record;
pub mod stage;

pub use error::{ModelError, Result};
pub use grid::{Cell, RawGrid};
pub use header::HeaderMap;
pub use patch::{Attachment, FieldAssignment, FormSubmission, PatchRequest};
pub use record::{StageBucket, StageRecord, StageStatus};
pub use stage::{ColumnRule, StageDefinition, normalize_header};

/// Formats a completion timestamp as written into `actualN` columns.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
