//! Tracker configuration: TOML file, then environment, then command-line flags.
//!
//! The file lives in the platform config folder unless `--config` points
//! elsewhere:
//! - Linux: ~/.config/pump-tracker/config.toml
//! - macOS: ~/Library/Application Support/pump-tracker/config.toml
//! - Windows: %APPDATA%/pump-tracker/config/config.toml

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use pump_gateway::{DEFAULT_SHEET_NAME, DEFAULT_TIMEOUT, GatewayConfig};

const APP_QUALIFIER: &str = "";
const APP_ORG: &str = "";
const APP_NAME: &str = "pump-tracker";
const CONFIG_FILENAME: &str = "config.toml";

pub const ENV_ENDPOINT: &str = "PUMP_ENDPOINT";
pub const ENV_SHEET_ID: &str = "PUMP_SHEET_ID";
pub const ENV_SHEET_NAME: &str = "PUMP_SHEET_NAME";
pub const ENV_FOLDER_ID: &str = "PUMP_FOLDER_ID";

/// Connection settings as written in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub endpoint: Option<String>,
    pub sheet_id: Option<String>,
    pub sheet_name: String,
    /// Drive folder for uploaded documents; only needed when submitting files.
    pub folder_id: Option<String>,
    pub timeout_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            sheet_id: None,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            folder_id: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Values given on the command line, applied last.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub sheet_id: Option<String>,
    pub sheet_name: Option<String>,
}

/// Default config file location, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

impl TrackerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("parse tracker config")
    }

    /// Reads `path`. An explicit path must exist; a missing default file
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let content = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            return Self::from_toml_str(&content);
        }
        let Some(path) = default_config_path() else {
            tracing::debug!("no platform config directory, using defaults");
            return Ok(Self::default());
        };
        match fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "loaded tracker config");
                Self::from_toml_str(&content)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err).with_context(|| format!("read config {}", path.display())),
        }
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(endpoint) = value(ENV_ENDPOINT) {
            self.endpoint = Some(endpoint);
        }
        if let Some(sheet_id) = value(ENV_SHEET_ID) {
            self.sheet_id = Some(sheet_id);
        }
        if let Some(sheet_name) = value(ENV_SHEET_NAME) {
            self.sheet_name = sheet_name;
        }
        if let Some(folder_id) = value(ENV_FOLDER_ID) {
            self.folder_id = Some(folder_id);
        }
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = Some(endpoint);
        }
        if let Some(sheet_id) = overrides.sheet_id {
            self.sheet_id = Some(sheet_id);
        }
        if let Some(sheet_name) = overrides.sheet_name {
            self.sheet_name = sheet_name;
        }
    }

    /// Validates the merged settings into gateway settings.
    pub fn gateway_config(&self) -> Result<GatewayConfig> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            bail!("no endpoint configured (set `endpoint` in config.toml, {ENV_ENDPOINT} or --endpoint)");
        };
        let Some(sheet_id) = self.sheet_id.as_deref() else {
            bail!("no sheet id configured (set `sheet_id` in config.toml, {ENV_SHEET_ID} or --sheet-id)");
        };
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        let config = GatewayConfig::new(endpoint, sheet_id)?
            .with_sheet_name(self.sheet_name.clone())
            .with_folder_id(self.folder_id.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs));
        Ok(config)
    }
}
