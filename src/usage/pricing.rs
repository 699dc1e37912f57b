//! Per-model token pricing.

use std::collections::HashMap;
use tracing::warn;

/// Model used for estimates when none is given.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Price per million tokens, in US dollars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl ModelPricing {
    /// Cost in dollars for the given token counts.
    pub fn cost(&self, input_tokens: f64, output_tokens: f64) -> f64 {
        let input_cost = (input_tokens / 1_000_000.0) * self.input_per_million;
        let output_cost = (output_tokens / 1_000_000.0) * self.output_per_million;
        input_cost + output_cost
    }
}

const BUILTIN_PRICES: &[(&str, ModelPricing)] = &[(
    "gpt-4o",
    ModelPricing {
        input_per_million: 5.0,
        output_per_million: 20.0,
    },
)];

/// Read-only mapping from model name to pricing.
#[derive(Debug, Clone)]
pub struct PricingTable {
    models: HashMap<String, ModelPricing>,
}

impl PricingTable {
    /// The built-in price list.
    pub fn builtin() -> Self {
        Self {
            models: BUILTIN_PRICES
                .iter()
                .map(|(name, pricing)| (name.to_string(), *pricing))
                .collect(),
        }
    }

    /// Exact lookup.
    pub fn get(&self, model: &str) -> Option<ModelPricing> {
        self.models.get(model).copied()
    }

    /// Look up a model, falling back to [`DEFAULT_MODEL`] with a warning.
    pub fn resolve(&self, model: &str) -> (String, ModelPricing) {
        if let Some(pricing) = self.get(model) {
            return (model.to_string(), pricing);
        }
        warn!("Unknown model '{}'. Using {} pricing.", model, DEFAULT_MODEL);
        let pricing = self.get(DEFAULT_MODEL).unwrap_or(BUILTIN_PRICES[0].1);
        (DEFAULT_MODEL.to_string(), pricing)
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The three cost scenarios reported for a token total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimates {
    /// Every token billed as input.
    pub all_input: f64,
    /// Every token billed as output.
    pub all_output: f64,
    /// Half input, half output.
    pub mixed: f64,
}

impl CostEstimates {
    pub fn for_tokens(total_tokens: usize, pricing: &ModelPricing) -> Self {
        let total = total_tokens as f64;
        Self {
            all_input: pricing.cost(total, 0.0),
            all_output: pricing.cost(0.0, total),
            mixed: pricing.cost(total / 2.0, total / 2.0),
        }
    }
}
