//! Sub-configuration structs with defaults matching the stock setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Evaluation run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// YAML mapping of prompt id to prompt text
    pub prompts_file: PathBuf,

    /// Directory holding the evaluation images
    pub image_dir: PathBuf,

    /// Where timestamped result CSVs are written
    pub output_dir: PathBuf,

    /// Model identifier in `provider/model` form
    pub model: String,

    /// Output token cap per call
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Recognized image extensions
    pub supported_formats: Vec<String>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            prompts_file: PathBuf::from("prompts.yaml"),
            image_dir: PathBuf::from("eval_images"),
            output_dir: PathBuf::from("."),
            model: "gemini/gemini-2.0-flash".to_string(),
            max_tokens: 100,
            temperature: 0.0,
            supported_formats: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "webp".to_string(),
            ],
        }
    }
}

/// Resource limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// LLM call timeout in milliseconds
    pub llm_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            llm_timeout_ms: 600_000,
        }
    }
}

/// Target schema and batching for generated username SQL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsernamesConfig {
    pub table: String,
    pub column: String,
    /// Rows per INSERT statement
    pub batch_size: usize,
}

impl Default for UsernamesConfig {
    fn default() -> Self {
        Self {
            table: "username_pool".to_string(),
            column: "username".to_string(),
            batch_size: 500,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// LLM provider configurations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LlmConfig {
    /// Google Gemini configuration
    pub gemini: Option<GeminiConfig>,

    /// OpenAI configuration
    pub openai: Option<OpenAiConfig>,
}

/// Gemini configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Generative Language API base URL
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: "${GEMINI_API_KEY}".to_string(),
        }
    }
}

/// OpenAI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Chat Completions endpoint
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: "${OPENAI_API_KEY}".to_string(),
        }
    }
}

/// USD price per million tokens for one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}
