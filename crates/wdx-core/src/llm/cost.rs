//! Cost estimation for completion calls from reported token usage.

use super::provider::{ModelId, TokenUsage};
use crate::config::ModelPricing;
use crate::error::LlmError;
use std::collections::BTreeMap;

/// Built-in USD prices per million tokens, keyed by `provider/model`.
const BUILTIN_PRICING: &[(&str, f64, f64)] = &[
    ("gemini/gemini-2.0-flash", 0.10, 0.40),
    ("gemini/gemini-2.0-flash-001", 0.10, 0.40),
    ("gemini/gemini-2.0-flash-lite", 0.075, 0.30),
    ("gemini/gemini-1.5-flash", 0.075, 0.30),
    ("gemini/gemini-1.5-pro", 1.25, 5.00),
    ("gemini/gemini-2.5-flash", 0.30, 2.50),
    ("gemini/gemini-2.5-pro", 1.25, 10.00),
    ("openai/gpt-4o", 2.50, 10.00),
    ("openai/gpt-4o-mini", 0.15, 0.60),
    ("openai/gpt-4.1", 2.00, 8.00),
    ("openai/gpt-4.1-mini", 0.40, 1.60),
];

/// Pricing lookup: built-in table overlaid with config entries.
#[derive(Debug, Clone, Default)]
pub struct PricingTable {
    overrides: BTreeMap<String, ModelPricing>,
}

impl PricingTable {
    pub fn new(overrides: BTreeMap<String, ModelPricing>) -> Self {
        Self { overrides }
    }

    /// Find pricing for a model identifier, config entries first.
    pub fn lookup(&self, model: &str) -> Option<ModelPricing> {
        let qualified = ModelId::parse(model)
            .map(|id| id.qualified())
            .unwrap_or_else(|_| model.to_string());

        if let Some(p) = self.overrides.get(&qualified).or_else(|| self.overrides.get(model)) {
            return Some(*p);
        }

        BUILTIN_PRICING
            .iter()
            .find(|(name, _, _)| *name == qualified)
            .map(|(_, input, output)| ModelPricing {
                input_per_million: *input,
                output_per_million: *output,
            })
    }

    /// Estimate the USD cost of one call.
    ///
    /// Missing usage, an unpriced model or a non-positive estimate are errors.
    pub fn completion_cost(&self, model: &str, usage: Option<TokenUsage>) -> Result<f64, LlmError> {
        let usage = usage.ok_or_else(|| LlmError::CostUnavailable {
            model: model.to_string(),
            reason: "response did not report token usage".to_string(),
        })?;

        let pricing = self.lookup(model).ok_or_else(|| LlmError::CostUnavailable {
            model: model.to_string(),
            reason: "no pricing configured for model".to_string(),
        })?;

        let cost = (usage.prompt_tokens as f64 / 1_000_000.0) * pricing.input_per_million
            + (usage.completion_tokens as f64 / 1_000_000.0) * pricing.output_per_million;

        if cost > 0.0 {
            Ok(cost)
        } else {
            Err(LlmError::CostUnavailable {
                model: model.to_string(),
                reason: "estimate came out as zero".to_string(),
            })
        }
    }
}
