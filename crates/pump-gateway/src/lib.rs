//! Client for the sheet service behind the pump tracker.
//!
//! The service exposes three actions on one endpoint:
//!
//! - `read` (GET) returns the whole sheet as an array of rows, optionally
//!   wrapped as `{"data": rows}`;
//! - `update` (POST, form-encoded) writes a sparse `{columnIndex: value}`
//!   object into a 1-based row;
//! - `uploadFile` (POST, form-encoded) stores a base64 document and returns
//!   `{"success": true, "fileUrl": ...}`.
//!
//! [`SheetGateway`] abstracts those actions so the stage engine can be driven
//! by [`HttpGateway`] in production and by an in-memory sheet in tests.

#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod response;

pub use client::{DEFAULT_SHEET_NAME, DEFAULT_TIMEOUT, GatewayConfig, HttpGateway, SheetGateway};
pub use error::{GatewayError, Result};
pub use response::{
    OPTIMISTIC_BODY_MAX, UpdateVerdict, decode_grid, decode_upload, interpret_update_body,
};
