//! Error types for the sheet service client.

use thiserror::Error;

/// Errors that can occur while talking to the sheet service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// Required connection settings are missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request never produced a response (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success HTTP status.
    #[error("service returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The read response was not a grid.
    #[error("could not decode sheet data: {0}")]
    Decode(String),

    /// The update action answered with something other than success.
    #[error("update rejected: {0}")]
    UpdateRejected(String),

    /// The uploadFile action did not return a file URL.
    #[error("file upload failed: {0}")]
    UploadFailed(String),
}

impl GatewayError {
    /// Returns a short message suitable for showing to an operator.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Config(_) => "The sheet endpoint or sheet id is not configured.",
            Self::Network(_) => "Could not reach the sheet service. Check your connection.",
            Self::Status { .. } => "The sheet service reported an error.",
            Self::Decode(_) => "The sheet service returned data in an unexpected shape.",
            Self::UpdateRejected(_) => "The sheet service did not accept the update.",
            Self::UploadFailed(_) => "The document could not be uploaded.",
        }
    }

    /// Whether retrying the same request might succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages() {
        let err = GatewayError::Network("connection refused".to_string());
        assert!(err.user_message().contains("connection"));

        let err = GatewayError::UploadFailed("quota".to_string());
        assert!(err.user_message().contains("uploaded"));
    }

    #[test]
    fn retryable() {
        assert!(GatewayError::Network("timeout".to_string()).is_retryable());
        assert!(
            GatewayError::Status {
                status: 503,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            !GatewayError::Status {
                status: 400,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(!GatewayError::UpdateRejected("bad row".to_string()).is_retryable());
    }
}
