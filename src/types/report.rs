//! Report value types handed to the renderer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Totals for one model within one date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ModelBucket {
    pub requests: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
}

/// Totals for one calendar date, broken down by model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateBucket {
    pub date: NaiveDate,
    pub total_requests: u64,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_tokens: u64,
    pub total_input_cost: f64,
    pub total_output_cost: f64,
    pub total_cost: f64,
    pub models: BTreeMap<String, ModelBucket>,
}

impl DateBucket {
    /// Build a date bucket whose totals are the sum of `models`.
    pub fn from_models(date: NaiveDate, models: BTreeMap<String, ModelBucket>) -> Self {
        let mut bucket = Self {
            date,
            total_requests: 0,
            total_input_tokens: 0,
            total_output_tokens: 0,
            total_tokens: 0,
            total_input_cost: 0.0,
            total_output_cost: 0.0,
            total_cost: 0.0,
            models: BTreeMap::new(),
        };

        for model in models.values() {
            bucket.total_requests = bucket.total_requests.saturating_add(model.requests);
            bucket.total_input_tokens = bucket
                .total_input_tokens
                .saturating_add(model.input_tokens);
            bucket.total_output_tokens = bucket
                .total_output_tokens
                .saturating_add(model.output_tokens);
            bucket.total_tokens = bucket.total_tokens.saturating_add(model.total_tokens);
            bucket.total_input_cost += model.input_cost;
            bucket.total_output_cost += model.output_cost;
            bucket.total_cost += model.total_cost;
        }

        bucket.models = models;
        bucket
    }
}

/// Chronologically ordered date buckets, empty dates excluded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Report {
    pub days: Vec<DateBucket>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Sum across all days in the report
    pub fn totals(&self) -> ReportTotals {
        let mut totals = ReportTotals::default();
        for day in &self.days {
            totals.requests = totals.requests.saturating_add(day.total_requests);
            totals.input_tokens = totals.input_tokens.saturating_add(day.total_input_tokens);
            totals.output_tokens = totals
                .output_tokens
                .saturating_add(day.total_output_tokens);
            totals.total_tokens = totals.total_tokens.saturating_add(day.total_tokens);
            totals.input_cost += day.total_input_cost;
            totals.output_cost += day.total_output_cost;
            totals.total_cost += day.total_cost;
        }
        totals
    }
}

/// Grand totals across a whole report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ReportTotals {
    pub requests: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
}
