//! Token cost calculation

use super::pricing::PricingRule;

const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Input, output and total cost for a token count
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostBreakdown {
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
}

/// Cost of `input_units`/`output_units` at per-million prices. No rounding.
pub fn calculate(
    input_units: u64,
    output_units: u64,
    input_price_per_million: f64,
    output_price_per_million: f64,
) -> CostBreakdown {
    let input_cost = input_units as f64 / TOKENS_PER_MILLION * input_price_per_million;
    let output_cost = output_units as f64 / TOKENS_PER_MILLION * output_price_per_million;
    CostBreakdown {
        input_cost,
        output_cost,
        total_cost: input_cost + output_cost,
    }
}

/// [`calculate`] with prices taken from `rule`
pub fn calculate_with_rule(input_units: u64, output_units: u64, rule: PricingRule) -> CostBreakdown {
    calculate(
        input_units,
        output_units,
        rule.input_price_per_million,
        rule.output_price_per_million,
    )
}
