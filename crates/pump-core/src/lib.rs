#![deny(unsafe_code)]
//! Stage engine for the pump beneficiary pipeline.
//!
//! Each stage is a [`pump_model::StageDefinition`] from [`stages`]. For a
//! fetched sheet the engine resolves the stage's columns, projects rows into
//! records ([`projector`]), splits them into pending and history
//! ([`classifier`]) and turns form submissions into sparse row patches
//! ([`patch`], [`submit`]). [`board`] ties those steps to a
//! [`pump_gateway::SheetGateway`].

pub mod board;
pub mod classifier;
pub mod error;
pub mod patch;
pub mod projector;
pub mod stages;
pub mod submit;

pub use board::{Selection, StageBoard, StageView, filter_records};
pub use classifier::{classify, classify_sentinels, partition};
pub use error::{PatchError, RowFailure, SubmitError};
pub use patch::{build_patch, format_timestamp, validate_form};
pub use projector::{project_records, project_row};
pub use stages::{COMMON_FIELDS, all_stages, find_stage};
pub use submit::{SubmitReport, submit_stage};
