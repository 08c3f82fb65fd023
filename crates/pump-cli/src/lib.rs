//! Library side of the `pump-tracker` binary: configuration, logging and
//! upload helpers.

pub mod config;
pub mod logging;
pub mod mime;
