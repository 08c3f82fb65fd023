//! Error types for header detection.

use thiserror::Error;

/// Errors from locating the sheet header.
///
/// Unresolved columns are not errors: they surface as `None` in the
/// [`pump_model::HeaderMap`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("header row not found in the first {scanned} rows")]
    HeaderNotFound { scanned: usize },
}

pub type Result<T> = std::result::Result<T, MapError>;
