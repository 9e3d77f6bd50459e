//! Services for pricing, aggregation and data loading

pub mod aggregator;
pub mod cost;
pub mod data_loader;
pub mod pricing;
pub mod report;
pub mod usage_client;

pub use aggregator::Aggregator;
pub use data_loader::{DataLoaderService, SourceSelection};
pub use pricing::{PricingRule, PricingTable};
pub use report::{assemble, build_report};
pub use usage_client::{RemoteUsageSource, UsageApiClient};
