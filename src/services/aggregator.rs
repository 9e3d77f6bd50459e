//! Aggregator service: buckets usage records by date and model
//!
//! Records from every enabled source are merged before grouping, so a model
//! reported by both the usage endpoint and the local logs on the same day
//! lands in a single [`ModelBucket`]. Costs are computed once per
//! (date, model) group from the summed token counts.

use super::cost;
use super::pricing::PricingTable;
use crate::types::{DateBucket, ModelBucket, UsageRecord};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Running token totals for one (date, model) group
#[derive(Debug, Clone, Default)]
pub struct ModelBucketBuilder {
    requests: u64,
    input_tokens: u64,
    output_tokens: u64,
    total_tokens: u64,
}

impl ModelBucketBuilder {
    pub fn add(&mut self, record: &UsageRecord) {
        self.requests = self.requests.saturating_add(1);
        self.input_tokens = self.input_tokens.saturating_add(record.input_units);
        self.output_tokens = self.output_tokens.saturating_add(record.output_units);
        self.total_tokens = self.total_tokens.saturating_add(record.total_units);
    }

    /// Price the accumulated totals for `model`
    pub fn finish(&self, model: &str, pricing: &PricingTable) -> ModelBucket {
        let cost = cost::calculate_with_rule(
            self.input_tokens,
            self.output_tokens,
            pricing.resolve(model),
        );
        ModelBucket {
            requests: self.requests,
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
            total_tokens: self.total_tokens,
            input_cost: cost.input_cost,
            output_cost: cost.output_cost,
            total_cost: cost.total_cost,
        }
    }
}

/// Per-model builders for one date
#[derive(Debug, Clone, Default)]
pub struct DateBucketBuilder {
    models: BTreeMap<String, ModelBucketBuilder>,
}

impl DateBucketBuilder {
    pub fn add(&mut self, record: &UsageRecord) {
        match self.models.get_mut(&record.model) {
            Some(builder) => builder.add(record),
            None => {
                let mut builder = ModelBucketBuilder::default();
                builder.add(record);
                self.models.insert(record.model.clone(), builder);
            }
        }
    }

    pub fn finish(&self, date: NaiveDate, pricing: &PricingTable) -> DateBucket {
        let models = self
            .models
            .iter()
            .map(|(model, builder)| (model.clone(), builder.finish(model, pricing)))
            .collect();
        DateBucket::from_models(date, models)
    }
}

/// Aggregator for computing usage statistics
pub struct Aggregator;

impl Aggregator {
    /// Group records by date, then model, and price each group.
    ///
    /// Records whose timestamp has no parsable date are left out.
    pub fn aggregate(
        records: &[UsageRecord],
        pricing: &PricingTable,
    ) -> BTreeMap<NaiveDate, DateBucket> {
        let mut builders: BTreeMap<NaiveDate, DateBucketBuilder> = BTreeMap::new();

        for record in records {
            let Some(date) = record.date() else {
                continue;
            };
            builders.entry(date).or_default().add(record);
        }

        builders
            .into_iter()
            .map(|(date, builder)| (date, builder.finish(date, pricing)))
            .collect()
    }
}
