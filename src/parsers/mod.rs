//! Parsers that turn raw usage sources into [`UsageRecord`](crate::types::UsageRecord)s

pub mod remote;
mod token_log;

pub use remote::normalize_payload;
pub use token_log::TokenLogParser;
