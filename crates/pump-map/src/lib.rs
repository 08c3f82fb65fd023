#![deny(unsafe_code)]
//! Header row detection and column resolution for the Project Main sheet.

pub mod error;
pub mod header;
pub mod resolver;

pub use error::{MapError, Result};
pub use header::{
    CANONICAL_HEADER_ROW, DEFAULT_REQUIRED_HEADERS, HEADER_MIN_MATCHES, HEADER_SCAN_LIMIT,
    header_cells, locate_header,
};
pub use resolver::{map_stage_columns, resolve_column, resolve_columns};
