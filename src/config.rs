//! Run settings
//!
//! Read from an optional JSON file; command-line flags override individual
//! fields afterwards. Nothing here is global: the resolved [`Settings`] is
//! turned into a [`SourceSelection`] and passed down explicitly.

use crate::services::SourceSelection;
use crate::types::{Result, TokreportError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default settings file, relative to the working directory
pub const DEFAULT_SETTINGS_PATH: &str = "conf/settings.json";

/// Default pricing file, relative to the working directory
pub const DEFAULT_PRICING_PATH: &str = "conf/token_pricing.json";

/// Default CLIProxyAPI base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8317";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Query the usage endpoint
    pub remote_enabled: bool,
    /// Include local token log files
    pub log_enabled: bool,
    /// Directory holding `token_usage_<date>.log` files
    pub log_directory: PathBuf,
    pub api_url: String,
    pub pricing_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remote_enabled: true,
            log_enabled: false,
            log_directory: default_log_directory(),
            api_url: DEFAULT_API_URL.to_string(),
            pricing_path: PathBuf::from(DEFAULT_PRICING_PATH),
        }
    }
}

impl Settings {
    /// Load settings from `path`.
    ///
    /// Returns defaults if the file doesn't exist; a malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "settings file does not exist; using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|e| {
            TokreportError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let settings: Settings = serde_json::from_str(&raw).map_err(|e| {
            TokreportError::Config(format!("invalid settings file {}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn source_selection(&self) -> SourceSelection {
        SourceSelection {
            remote: self.remote_enabled,
            local_logs: self.log_enabled,
        }
    }
}

/// `~/logs`, or `./logs` when the home directory is unknown
fn default_log_directory() -> PathBuf {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
