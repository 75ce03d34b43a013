//! LLM integration for image labelling.
//!
//! Provides a provider abstraction over completion backends (Gemini, OpenAI)
//! and token-based cost estimation.

pub mod cost;
pub(crate) mod gemini;
pub(crate) mod openai;
pub mod provider;

pub use cost::PricingTable;
pub use provider::{
    mime_type_for, ImageInput, LlmProvider, LlmProviderFactory, LlmRequest, LlmResponse, ModelId,
    TokenUsage,
};
