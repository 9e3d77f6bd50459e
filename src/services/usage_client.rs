//! Client for the CLIProxyAPI management usage endpoint

use crate::types::{Result, TokreportError};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Management usage path, relative to the API base URL
const USAGE_PATH: &str = "/v0/management/usage";

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// A source of the raw usage payload
pub trait RemoteUsageSource {
    /// Fetch the payload. Any failure is fatal to the run.
    fn fetch(&self) -> Result<Value>;
}

/// Blocking HTTP client for the usage endpoint. No retries.
pub struct UsageApiClient {
    base_url: String,
    management_key: Option<String>,
}

impl UsageApiClient {
    pub fn new(base_url: &str, management_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            management_key: management_key.filter(|k| !k.is_empty()),
        }
    }

    /// Full URL of the usage endpoint
    pub fn usage_url(&self) -> String {
        format!("{}{}", self.base_url, USAGE_PATH)
    }
}

impl RemoteUsageSource for UsageApiClient {
    fn fetch(&self) -> Result<Value> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TokreportError::Fetch(format!("HTTP client error: {}", e)))?;

        let url = self.usage_url();
        let mut request = client.get(&url);
        if let Some(key) = &self.management_key {
            request = request.bearer_auth(key);
        }

        debug!(url = %url, "fetching usage data");
        let response = request
            .send()
            .map_err(|e| TokreportError::Fetch(format!("HTTP request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| TokreportError::Fetch(format!("usage endpoint error: {}", e)))?;

        response
            .json()
            .map_err(|e| TokreportError::Fetch(format!("JSON parse error: {}", e)))
    }
}
