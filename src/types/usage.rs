//! Usage record type shared by every source

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Model name used when a source does not report one
pub const UNKNOWN_MODEL: &str = "unknown";

/// Where a usage record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UsageSource {
    /// CLIProxyAPI management usage endpoint
    Remote,
    /// Per-day `token_usage_<date>.log` files
    LocalLog,
}

/// One observed request's usage, normalized across sources
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsageRecord {
    /// ISO-8601 date-time as reported by the source
    pub timestamp: String,
    pub model: String,
    pub input_units: u64,
    pub output_units: u64,
    /// Source-reported total; not recomputed once set
    pub total_units: u64,
    pub source: UsageSource,
}

impl UsageRecord {
    /// Build a record, applying the shared defaults: an empty model becomes
    /// [`UNKNOWN_MODEL`] and a missing total is `input + output`.
    pub fn new(
        timestamp: impl Into<String>,
        model: Option<&str>,
        input_units: u64,
        output_units: u64,
        total_units: Option<u64>,
        source: UsageSource,
    ) -> Self {
        let model = match model {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => UNKNOWN_MODEL.to_string(),
        };
        Self {
            timestamp: timestamp.into(),
            model,
            input_units,
            output_units,
            total_units: total_units
                .unwrap_or_else(|| input_units.saturating_add(output_units)),
            source,
        }
    }

    /// Calendar date of the record: the part of `timestamp` before the time
    /// separator. `None` when the timestamp is empty or not a valid date.
    pub fn date(&self) -> Option<NaiveDate> {
        let ts = self.timestamp.trim();
        if ts.is_empty() {
            return None;
        }
        let date_part = ts.split(['T', ' ']).next().unwrap_or(ts);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }
}
