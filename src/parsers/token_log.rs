//! Per-day token usage log parser (`token_usage_<YYYY-MM-DD>.log`)

use crate::types::{Result, TokreportError, UsageRecord, UsageSource};
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

const FILE_PREFIX: &str = "token_usage_";
const FILE_SUFFIX: &str = ".log";

/// Log line structure
#[derive(Deserialize)]
struct TokenLogLine {
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    token_usage: Option<TokenLogUsage>,
}

#[derive(Deserialize, Default)]
struct TokenLogUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: Option<u64>,
}

fn date_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static regex"))
}

/// Parser for the local per-day token log directory
pub struct TokenLogParser {
    data_dir: PathBuf,
}

impl TokenLogParser {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Glob pattern for log files
    pub fn file_pattern(&self) -> &str {
        "token_usage_*.log"
    }

    /// Path of the log file for `date`
    pub fn file_path(&self, date: NaiveDate) -> PathBuf {
        self.data_dir
            .join(format!("{}{}{}", FILE_PREFIX, date.format("%Y-%m-%d"), FILE_SUFFIX))
    }

    /// Dates that have a log file, sorted ascending.
    ///
    /// Files whose embedded date is not `YYYY-MM-DD` are ignored. A missing
    /// directory yields an empty list.
    pub fn available_dates(&self) -> Vec<NaiveDate> {
        // The directory part is matched literally, even if it contains `[` or `*`
        let dir = glob::Pattern::escape(&self.data_dir.to_string_lossy());
        let pattern = Path::new(&dir).join(self.file_pattern());
        let paths: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
            .map(|paths| paths.filter_map(|e| e.ok()).collect())
            .unwrap_or_default();

        let mut dates: Vec<NaiveDate> = paths
            .iter()
            .filter(|p| p.is_file())
            .filter_map(|p| p.file_name()?.to_str().and_then(date_from_file_name))
            .collect();
        dates.sort();
        dates.dedup();
        dates
    }

    /// Records from the log file for `date`; empty when the file is absent.
    pub fn parse_date(&self, date: NaiveDate) -> Result<Vec<UsageRecord>> {
        let path = self.file_path(date);
        match self.parse_file(&path, date) {
            Err(TokreportError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "log file does not exist");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Parse one log file. Malformed lines are skipped with a warning.
    ///
    /// Lines without a timestamp are attributed to `file_date`.
    pub fn parse_file(&self, path: &Path, file_date: NaiveDate) -> Result<Vec<UsageRecord>> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let fallback_timestamp = format!("{}T00:00:00", file_date.format("%Y-%m-%d"));

        let mut records = Vec::new();
        let mut buf: Vec<u8> = Vec::new();
        let mut line_no = 0usize;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            match Self::parse_line(&mut buf, &fallback_timestamp) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => {
                    warn!(path = %path.display(), line = line_no, error = %e, "skipping malformed log line");
                }
            }
        }

        Ok(records)
    }

    /// Parse a single line. `Ok(None)` for blank lines.
    fn parse_line(line: &mut [u8], fallback_timestamp: &str) -> Result<Option<UsageRecord>> {
        let line = trim_ascii(line);
        if line.is_empty() {
            return Ok(None);
        }

        let data: TokenLogLine =
            simd_json::from_slice(line).map_err(|e| TokreportError::Parse(e.to_string()))?;

        let usage = data.token_usage.unwrap_or_default();
        let timestamp = match data.timestamp {
            Some(ts) if !ts.trim().is_empty() => ts,
            _ => fallback_timestamp.to_string(),
        };

        Ok(Some(UsageRecord::new(
            timestamp,
            data.model.as_deref(),
            usage.prompt_tokens,
            usage.completion_tokens,
            usage.total_tokens,
            UsageSource::LocalLog,
        )))
    }
}

/// Extract the date from `token_usage_<date>.log`
fn date_from_file_name(name: &str) -> Option<NaiveDate> {
    let token = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
    if !date_token_regex().is_match(token) {
        return None;
    }
    NaiveDate::parse_from_str(token, "%Y-%m-%d").ok()
}

fn trim_ascii(bytes: &mut [u8]) -> &mut [u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &mut bytes[start..end]
}
