//! Pricing table for cost calculation
//!
//! Loads per-million-token prices from the pricing configuration file:
//!
//! ```json
//! {
//!   "models": { "glm-4.6": { "input_token_per_million": 0.6, "output_token_per_million": 2.2 } },
//!   "pricing": { "default": { "input_token_per_million": 1.0, "output_token_per_million": 7.5 } }
//! }
//! ```
//!
//! A model entry that omits a price inherits it from the default rule. The
//! default rule itself is mandatory.

use crate::types::{Result, TokreportError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Input/output price pair, in currency units per million tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingRule {
    #[serde(rename = "input_token_per_million")]
    pub input_price_per_million: f64,
    #[serde(rename = "output_token_per_million")]
    pub output_price_per_million: f64,
}

impl PricingRule {
    pub fn new(input_price_per_million: f64, output_price_per_million: f64) -> Self {
        Self {
            input_price_per_million,
            output_price_per_million,
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        for (field, price) in [
            ("input_token_per_million", self.input_price_per_million),
            ("output_token_per_million", self.output_price_per_million),
        ] {
            if !price.is_finite() || price < 0.0 {
                return Err(TokreportError::Pricing(format!(
                    "{}: {} must be a non-negative number, got {}",
                    name, field, price
                )));
            }
        }
        Ok(())
    }
}

/// Pricing file layout
#[derive(Deserialize)]
struct PricingFile {
    #[serde(default)]
    models: HashMap<String, PartialRule>,
    #[serde(default)]
    pricing: Option<PricingSection>,
}

#[derive(Deserialize)]
struct PricingSection {
    #[serde(default)]
    default: Option<PartialRule>,
}

#[derive(Deserialize)]
struct PartialRule {
    #[serde(default)]
    input_token_per_million: Option<f64>,
    #[serde(default)]
    output_token_per_million: Option<f64>,
}

/// Model → pricing rule mapping with a mandatory default
#[derive(Debug, Clone, PartialEq)]
pub struct PricingTable {
    models: HashMap<String, PricingRule>,
    default: PricingRule,
}

impl PricingTable {
    /// Create a table with only a default rule
    pub fn new(default: PricingRule) -> Self {
        Self {
            models: HashMap::new(),
            default,
        }
    }

    /// Add or replace a model rule
    pub fn with_model(mut self, model: impl Into<String>, rule: PricingRule) -> Self {
        self.models.insert(model.into(), rule);
        self
    }

    /// Load the pricing file. A missing or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => TokreportError::Pricing(format!(
                "pricing configuration file not found: {}",
                path.display()
            )),
            _ => TokreportError::Pricing(format!("failed to read {}: {}", path.display(), e)),
        })?;
        let table = Self::from_json_str(&content)?;
        debug!(path = %path.display(), models = table.model_count(), "loaded pricing table");
        Ok(table)
    }

    /// Parse pricing JSON
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: PricingFile = serde_json::from_str(content).map_err(|e| {
            TokreportError::Pricing(format!("pricing configuration format error: {}", e))
        })?;

        let default = file
            .pricing
            .and_then(|p| p.default)
            .ok_or_else(|| TokreportError::Pricing("missing pricing.default rule".into()))?;
        let default = match (
            default.input_token_per_million,
            default.output_token_per_million,
        ) {
            (Some(input), Some(output)) => PricingRule::new(input, output),
            _ => {
                return Err(TokreportError::Pricing(
                    "pricing.default must set input_token_per_million and output_token_per_million"
                        .into(),
                ))
            }
        };
        default.validate("pricing.default")?;

        let mut models = HashMap::with_capacity(file.models.len());
        for (name, partial) in file.models {
            let rule = PricingRule::new(
                partial
                    .input_token_per_million
                    .unwrap_or(default.input_price_per_million),
                partial
                    .output_token_per_million
                    .unwrap_or(default.output_price_per_million),
            );
            rule.validate(&format!("models.{}", name))?;
            models.insert(name, rule);
        }

        Ok(Self { models, default })
    }

    /// Effective prices for `model`: exact match, otherwise the default rule.
    ///
    /// No case folding or prefix matching is applied.
    pub fn resolve(&self, model: &str) -> PricingRule {
        self.models.get(model).copied().unwrap_or(self.default)
    }

    pub fn default_rule(&self) -> PricingRule {
        self.default
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "models": {
            "glm-4.6": {"input_token_per_million": 0.6, "output_token_per_million": 2.2},
            "gpt-5": {"input_token_per_million": 1.25},
            "free-model": {"input_token_per_million": 0, "output_token_per_million": 0}
        },
        "pricing": {"default": {"input_token_per_million": 1.0, "output_token_per_million": 7.5}}
    }"#;

    fn sample() -> PricingTable {
        PricingTable::from_json_str(SAMPLE).unwrap()
    }

    // ========== resolve tests ==========

    #[test]
    fn test_resolve_exact_match() {
        let rule = sample().resolve("glm-4.6");
        assert_eq!(rule, PricingRule::new(0.6, 2.2));
    }

    #[test]
    fn test_resolve_unknown_model_uses_default() {
        let table = sample();
        assert_eq!(table.resolve("claude-opus-4"), PricingRule::new(1.0, 7.5));
        assert_eq!(table.resolve("unknown"), PricingRule::new(1.0, 7.5));
        assert_eq!(table.resolve(""), PricingRule::new(1.0, 7.5));
    }

    #[test]
    fn test_resolve_is_case_and_prefix_sensitive() {
        let table = sample();
        assert_eq!(table.resolve("GLM-4.6"), table.default_rule());
        assert_eq!(table.resolve("glm-4.6-air"), table.default_rule());
        assert_eq!(table.resolve("zai/glm-4.6"), table.default_rule());
    }

    #[test]
    fn test_partial_model_rule_inherits_default() {
        assert_eq!(sample().resolve("gpt-5"), PricingRule::new(1.25, 7.5));
    }

    #[test]
    fn test_zero_prices_allowed() {
        assert_eq!(sample().resolve("free-model"), PricingRule::new(0.0, 0.0));
    }

    #[test]
    fn test_with_model_builder() {
        let table = PricingTable::new(PricingRule::new(1.0, 2.0))
            .with_model("a", PricingRule::new(3.0, 4.0));
        assert_eq!(table.resolve("a"), PricingRule::new(3.0, 4.0));
        assert_eq!(table.resolve("b"), PricingRule::new(1.0, 2.0));
        assert_eq!(table.model_count(), 1);
    }

    // ========== loading tests ==========

    #[test]
    fn test_missing_default_is_error() {
        let err = PricingTable::from_json_str(r#"{"models": {}}"#).unwrap_err();
        assert!(matches!(err, TokreportError::Pricing(_)));

        let err = PricingTable::from_json_str(r#"{"models": {}, "pricing": {}}"#).unwrap_err();
        assert!(matches!(err, TokreportError::Pricing(_)));
    }

    #[test]
    fn test_incomplete_default_is_error() {
        let err = PricingTable::from_json_str(
            r#"{"pricing": {"default": {"input_token_per_million": 1.0}}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("pricing.default"));
    }

    #[test]
    fn test_negative_price_is_error() {
        let err = PricingTable::from_json_str(
            r#"{"models": {"m": {"output_token_per_million": -1}},
                "pricing": {"default": {"input_token_per_million": 1.0, "output_token_per_million": 7.5}}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("models.m"));
    }

    #[test]
    fn test_malformed_json_is_error() {
        let err = PricingTable::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, TokreportError::Pricing(_)));
    }

    #[test]
    fn test_wrong_type_is_error() {
        let err = PricingTable::from_json_str(
            r#"{"pricing": {"default": {"input_token_per_million": "cheap", "output_token_per_million": 1}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TokreportError::Pricing(_)));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("token_pricing.json");
        fs::write(&path, SAMPLE).unwrap();

        let table = PricingTable::load(&path).unwrap();

        assert_eq!(table.model_count(), 3);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = PricingTable::load(&temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, TokreportError::Pricing(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_fixture() {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("token_pricing.json");

        let table = PricingTable::load(&path).unwrap();

        assert_eq!(table.default_rule(), PricingRule::new(1.0, 7.5));
    }
}
