//! Data loading service
//!
//! Collects usage records from the enabled sources into one sequence. Which
//! sources participate is decided by the caller through [`SourceSelection`].

use crate::parsers::{normalize_payload, TokenLogParser};
use crate::services::usage_client::RemoteUsageSource;
use crate::types::{Result, UsageRecord};
use tracing::{debug, warn};

/// Which usage sources contribute to a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSelection {
    /// Query the usage endpoint
    pub remote: bool,
    /// Read local token log files
    pub local_logs: bool,
}

/// Unified data loading service
pub struct DataLoaderService<R> {
    remote: R,
    logs: TokenLogParser,
}

impl<R: RemoteUsageSource> DataLoaderService<R> {
    pub fn new(remote: R, logs: TokenLogParser) -> Self {
        Self { remote, logs }
    }

    /// Records from every selected source, remote first.
    ///
    /// A remote failure aborts the load; log problems only skip what is bad.
    pub fn load(&self, selection: SourceSelection) -> Result<Vec<UsageRecord>> {
        let mut records = Vec::new();

        if selection.remote {
            records.extend(self.load_remote()?);
        }

        if selection.local_logs {
            records.extend(self.load_logs());
        }

        Ok(records)
    }

    /// Fetch and normalize the remote payload
    pub fn load_remote(&self) -> Result<Vec<UsageRecord>> {
        let payload = self.remote.fetch()?;
        let records = normalize_payload(&payload);
        debug!(count = records.len(), "loaded remote usage records");
        Ok(records)
    }

    /// Parse every dated log file in the log directory
    pub fn load_logs(&self) -> Vec<UsageRecord> {
        let mut records = Vec::new();

        for date in self.logs.available_dates() {
            match self.logs.parse_date(date) {
                Ok(entries) => records.extend(entries),
                Err(e) => {
                    warn!(
                        path = %self.logs.file_path(date).display(),
                        error = %e,
                        "failed to read log file, skipping"
                    );
                }
            }
        }

        debug!(
            dir = %self.logs.data_dir().display(),
            count = records.len(),
            "loaded local log records"
        );
        records
    }
}
