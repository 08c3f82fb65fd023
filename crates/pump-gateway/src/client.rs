//! HTTP client for the sheet service.

use std::future::Future;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use pump_model::{Attachment, PatchRequest, RawGrid};

use crate::error::{GatewayError, Result};
use crate::response::{UpdateVerdict, decode_grid, decode_upload, interpret_update_body};

/// User agent string for service requests.
const USER_AGENT_VALUE: &str = concat!("pump-tracker/", env!("CARGO_PKG_VERSION"));

/// Default request timeout, matching the point at which the stage pages gave
/// up on their loading indicator.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// The three actions every stage needs from the sheet service.
///
/// Implemented over HTTP by [`HttpGateway`]; tests substitute an in-memory
/// sheet.
pub trait SheetGateway {
    /// Fetches the whole sheet.
    fn read(&self) -> impl Future<Output = Result<RawGrid>> + Send;

    /// Writes the sparse patch into its row.
    fn update(&self, patch: &PatchRequest) -> impl Future<Output = Result<()>> + Send;

    /// Uploads a document and returns its URL.
    fn upload_file(&self, attachment: &Attachment) -> impl Future<Output = Result<String>> + Send;
}

/// Connection settings for the sheet service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL of the deployed sheet script.
    pub endpoint: String,
    /// Spreadsheet id.
    pub sheet_id: String,
    /// Tab holding the beneficiary table.
    pub sheet_name: String,
    /// Drive folder receiving uploaded documents.
    pub folder_id: Option<String>,
    pub timeout: Duration,
}

/// Tab name of the shared beneficiary table.
pub const DEFAULT_SHEET_NAME: &str = "Project Main";

impl GatewayConfig {
    /// Creates settings for `endpoint` and `sheet_id`, both of which are required.
    pub fn new(endpoint: impl Into<String>, sheet_id: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into().trim().to_string();
        let sheet_id = sheet_id.into().trim().to_string();
        if endpoint.is_empty() {
            return Err(GatewayError::Config("endpoint URL is required".to_string()));
        }
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(GatewayError::Config(format!(
                "endpoint must be an http(s) URL, got '{endpoint}'"
            )));
        }
        if sheet_id.is_empty() {
            return Err(GatewayError::Config("sheet id is required".to_string()));
        }
        Ok(Self {
            endpoint,
            sheet_id,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            folder_id: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_sheet_name(mut self, sheet_name: impl Into<String>) -> Self {
        self.sheet_name = sheet_name.into();
        self
    }

    #[must_use]
    pub fn with_folder_id(mut self, folder_id: Option<String>) -> Self {
        self.folder_id = folder_id.filter(|id| !id.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// [`SheetGateway`] over the service's HTTP interface.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Reads the body of a response, turning non-success statuses into errors.
    async fn body_text(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

impl SheetGateway for HttpGateway {
    async fn read(&self) -> Result<RawGrid> {
        let config = &self.config;
        tracing::debug!(sheet = %config.sheet_name, "reading sheet");

        let response = self
            .client
            .get(&config.endpoint)
            .query(&[
                ("action", "read"),
                ("sheet", config.sheet_name.as_str()),
                ("sheetName", config.sheet_name.as_str()),
                ("id", config.sheet_id.as_str()),
            ])
            .send()
            .await?;
        let body = Self::body_text(response).await?;
        let grid = decode_grid(&body)?;

        tracing::debug!(rows = grid.len(), "sheet read");
        Ok(grid)
    }

    async fn update(&self, patch: &PatchRequest) -> Result<()> {
        let config = &self.config;
        let row_data = patch.row_data()?;
        let row_index = patch.row_index.to_string();
        tracing::debug!(row_index = patch.row_index, columns = patch.fields.len(), "updating row");

        let response = self
            .client
            .post(&config.endpoint)
            .form(&[
                ("action", "update"),
                ("sheetName", config.sheet_name.as_str()),
                ("id", config.sheet_id.as_str()),
                ("rowIndex", row_index.as_str()),
                ("rowData", row_data.as_str()),
            ])
            .send()
            .await?;
        let body = Self::body_text(response).await?;

        match interpret_update_body(&body) {
            UpdateVerdict::Accepted => Ok(()),
            UpdateVerdict::AcceptedOptimistically => {
                tracing::warn!(
                    row_index = patch.row_index,
                    "update response was not JSON, assuming success"
                );
                Ok(())
            }
            UpdateVerdict::Rejected(text) => Err(GatewayError::UpdateRejected(text)),
        }
    }

    async fn upload_file(&self, attachment: &Attachment) -> Result<String> {
        let folder_id = self.config.folder_id.as_deref().ok_or_else(|| {
            GatewayError::Config("a folder id is required to upload documents".to_string())
        })?;
        let encoded = STANDARD.encode(&attachment.bytes);
        tracing::debug!(
            file_name = %attachment.file_name,
            bytes = attachment.bytes.len(),
            "uploading document"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .form(&[
                ("action", "uploadFile"),
                ("base64Data", encoded.as_str()),
                ("fileName", attachment.file_name.as_str()),
                ("mimeType", attachment.mime_type.as_str()),
                ("folderId", folder_id),
            ])
            .send()
            .await?;
        let body = Self::body_text(response)
            .await
            .map_err(|err| GatewayError::UploadFailed(err.to_string()))?;
        let url = decode_upload(&body)?;

        tracing::info!(file_name = %attachment.file_name, "document uploaded");
        Ok(url)
    }
}
