//! CLIProxyAPI usage payload normalizer
//!
//! The management endpoint returns a loosely-typed tree:
//!
//! ```text
//! usage.apis.<endpoint>.models.<model>.details[] = {timestamp, tokens: {input_tokens, output_tokens, total_tokens}}
//! ```
//!
//! Every "missing key → default" decision for that tree lives here, so the
//! aggregator only ever sees [`UsageRecord`] values.

use crate::types::{UsageRecord, UsageSource};
use serde_json::Value;
use tracing::warn;

/// Flatten a usage payload into records.
///
/// Missing containers are treated as empty and missing token counts as zero.
/// A detail that is not an object, or whose token counts are not
/// non-negative integers, is skipped with a warning.
pub fn normalize_payload(payload: &Value) -> Vec<UsageRecord> {
    let mut records = Vec::new();

    let Some(apis) = payload
        .get("usage")
        .and_then(|u| u.get("apis"))
        .and_then(Value::as_object)
    else {
        return records;
    };

    for (endpoint, api) in apis {
        let Some(models) = api.get("models").and_then(Value::as_object) else {
            continue;
        };

        for (model, model_data) in models {
            let Some(details) = model_data.get("details").and_then(Value::as_array) else {
                continue;
            };

            for (index, detail) in details.iter().enumerate() {
                match normalize_detail(model, detail) {
                    Some(record) => records.push(record),
                    None => warn!(
                        endpoint = %endpoint,
                        model = %model,
                        index,
                        "skipping malformed usage detail"
                    ),
                }
            }
        }
    }

    records
}

fn normalize_detail(model: &str, detail: &Value) -> Option<UsageRecord> {
    let detail = detail.as_object()?;

    let timestamp = match detail.get("timestamp") {
        None | Some(Value::Null) => "",
        Some(v) => v.as_str()?,
    };

    let tokens = match detail.get("tokens") {
        None | Some(Value::Null) => None,
        Some(v) => Some(v.as_object()?),
    };
    let count = |key: &str| -> Option<Option<u64>> {
        match tokens.and_then(|t| t.get(key)) {
            None | Some(Value::Null) => Some(None),
            Some(v) => v.as_u64().map(Some),
        }
    };

    let input = count("input_tokens")?.unwrap_or(0);
    let output = count("output_tokens")?.unwrap_or(0);
    let total = count("total_tokens")?;

    Some(UsageRecord::new(
        timestamp,
        Some(model),
        input,
        output,
        total,
        UsageSource::Remote,
    ))
}
