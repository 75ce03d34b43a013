//! LLM provider trait and request/response types.
//!
//! Defines the interface that all completion backends implement, plus the
//! factory that resolves a `provider/model` identifier to a concrete provider.

use crate::config::{Config, LlmConfig};
use crate::error::LlmError;
use async_trait::async_trait;
use base64::Engine;
use std::path::Path;
use std::time::Duration;

/// Resolve the MIME type of an image from its file extension.
///
/// Unrecognized extensions fall back to `application/octet-stream`.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        other => {
            tracing::warn!(
                "Unsupported image extension '{other}' for {}, sending as application/octet-stream",
                path.display()
            );
            "application/octet-stream"
        }
    }
}

/// Base64-encoded image ready to send to an LLM API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Encode raw bytes with an explicit MIME type.
    pub fn from_bytes(bytes: &[u8], media_type: &str) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Read an image file and encode it, deriving the MIME type from its extension.
    pub fn from_path(path: &Path) -> Result<Self, LlmError> {
        let bytes = std::fs::read(path).map_err(|source| LlmError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_bytes(&bytes, mime_type_for(path)))
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// A single-turn multimodal completion request.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// The inline image
    pub image: ImageInput,
    /// Text prompt for the model
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl LlmRequest {
    /// Build a labelling request: one user message carrying the prompt and image.
    pub fn classify(image: ImageInput, prompt: &str, max_tokens: u32, temperature: f32) -> Self {
        Self {
            image,
            prompt: prompt.to_string(),
            max_tokens,
            temperature,
        }
    }
}

/// Token counts reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// The response from a completion call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Trimmed text of the first choice
    pub text: String,
    /// Model identifier reported by the API
    pub model: String,
    /// Token usage, if reported
    pub usage: Option<TokenUsage>,
}

/// Trait that all completion providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn LlmProvider>` for dynamic dispatch).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Generate a completion for the given request.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// A model identifier split into provider and provider-local model name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelId {
    pub provider: String,
    pub model: String,
}

impl ModelId {
    /// Parse `provider/model`, inferring the provider for bare model names.
    pub fn parse(id: &str) -> Result<Self, LlmError> {
        if let Some((provider, model)) = id.split_once('/') {
            if provider.is_empty() || model.is_empty() {
                return Err(LlmError::UnknownProvider(id.to_string()));
            }
            return Ok(Self {
                provider: provider.to_string(),
                model: model.to_string(),
            });
        }

        let provider = if id.starts_with("gemini-") {
            "gemini"
        } else if id.starts_with("gpt-") || id.starts_with("o1") || id.starts_with("o3") {
            "openai"
        } else {
            return Err(LlmError::UnknownProvider(id.to_string()));
        };
        Ok(Self {
            provider: provider.to_string(),
            model: id.to_string(),
        })
    }

    /// Canonical `provider/model` form.
    pub fn qualified(&self) -> String {
        format!("{}/{}", self.provider, self.model)
    }
}

/// Factory that creates the appropriate provider from a model identifier and config.
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create a provider for `model_id` (e.g. `gemini/gemini-2.0-flash`).
    pub fn create(model_id: &str, config: &Config) -> Result<Box<dyn LlmProvider>, LlmError> {
        let id = ModelId::parse(model_id)?;
        let timeout = Duration::from_millis(config.limits.llm_timeout_ms);
        Self::create_for(&id, &config.llm, timeout)
    }

    fn create_for(
        id: &ModelId,
        config: &LlmConfig,
        timeout: Duration,
    ) -> Result<Box<dyn LlmProvider>, LlmError> {
        match id.provider.as_str() {
            "gemini" => {
                let cfg = config.gemini.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key)
                    .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
                    .ok_or_else(|| LlmError::MissingApiKey {
                        provider: "Gemini".to_string(),
                        env_var: "GEMINI_API_KEY".to_string(),
                    })?;
                Ok(Box::new(super::gemini::GeminiProvider::new(
                    &cfg.endpoint,
                    &api_key,
                    &id.model,
                    timeout,
                )))
            }
            "openai" => {
                let cfg = config.openai.clone().unwrap_or_default();
                let api_key =
                    resolve_env_var(&cfg.api_key).ok_or_else(|| LlmError::MissingApiKey {
                        provider: "OpenAI".to_string(),
                        env_var: "OPENAI_API_KEY".to_string(),
                    })?;
                Ok(Box::new(super::openai::OpenAiProvider::new(
                    &cfg.endpoint,
                    &api_key,
                    &id.model,
                    timeout,
                )))
            }
            _ => Err(LlmError::UnknownProvider(id.qualified())),
        }
    }
}
