//! Interpretation of sheet service response bodies.
//!
//! The service is a spreadsheet script: success is signalled in two different
//! JSON shapes, and some deployments answer updates with bare text. These
//! functions are kept free of I/O so the quirks stay testable.

use serde::Deserialize;
use serde_json::Value;

use pump_model::RawGrid;

use crate::error::{GatewayError, Result};

/// Unparsable update bodies up to this many characters are treated as success
/// unless they mention an error.
pub const OPTIMISTIC_BODY_MAX: usize = 64;

#[derive(Deserialize)]
#[serde(untagged)]
enum ReadPayload {
    Rows(RawGrid),
    Wrapped { data: RawGrid },
}

/// Decodes a read response: either a bare array of rows or `{"data": rows}`.
pub fn decode_grid(body: &str) -> Result<RawGrid> {
    match serde_json::from_str::<ReadPayload>(body) {
        Ok(ReadPayload::Rows(grid) | ReadPayload::Wrapped { data: grid }) => Ok(grid),
        Err(err) => {
            let error = serde_json::from_str::<Value>(body)
                .ok()
                .as_ref()
                .and_then(error_text);
            Err(GatewayError::Decode(error.unwrap_or_else(|| err.to_string())))
        }
    }
}

/// How an update response was judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateVerdict {
    /// `{"status":"success"}` or `{"success":true}`.
    Accepted,
    /// Not JSON, but short or mentioning success.
    AcceptedOptimistically,
    /// Anything else, with the text to show the operator.
    Rejected(String),
}

impl UpdateVerdict {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Judges an update response body.
#[must_use]
pub fn interpret_update_body(body: &str) -> UpdateVerdict {
    let trimmed = body.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value @ Value::Object(_)) => {
            if is_success(&value) {
                UpdateVerdict::Accepted
            } else {
                UpdateVerdict::Rejected(error_text(&value).unwrap_or_else(|| trimmed.to_string()))
            }
        }
        Ok(_) | Err(_) => {
            let lowered = trimmed.to_lowercase();
            if lowered.contains("success")
                || (trimmed.chars().count() <= OPTIMISTIC_BODY_MAX && !lowered.contains("error"))
            {
                UpdateVerdict::AcceptedOptimistically
            } else {
                UpdateVerdict::Rejected(trimmed.to_string())
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadPayload {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    file_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Extracts the file URL from an uploadFile response.
pub fn decode_upload(body: &str) -> Result<String> {
    let payload: UploadPayload = serde_json::from_str(body.trim())
        .map_err(|err| GatewayError::UploadFailed(format!("unreadable response: {err}")))?;
    match payload.file_url {
        Some(url) if payload.success && !url.trim().is_empty() => Ok(url),
        _ => Err(GatewayError::UploadFailed(
            payload
                .error
                .or(payload.message)
                .unwrap_or_else(|| "service did not return a file URL".to_string()),
        )),
    }
}

fn is_success(value: &Value) -> bool {
    let status = value
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|status| status.eq_ignore_ascii_case("success"));
    let flag = value.get("success").and_then(Value::as_bool) == Some(true);
    status || flag
}

fn error_text(value: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(*key))
        .map(|text| match text {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
}
