//! tokreport: merges CLIProxyAPI usage statistics and local token logs into
//! a per-date, per-model cost report.

pub mod cli;
pub mod config;
pub mod logging;
pub mod parsers;
pub mod render;
pub mod services;
pub mod types;
