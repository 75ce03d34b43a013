//! Error types for the WorldDex tools.
//!
//! Errors are split by the stage that raises them so the CLI can tell a bad
//! input (abort the command) apart from a failed model call (record and move on).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for wdx operations.
#[derive(Error, Debug)]
pub enum WdxError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Missing or unusable inputs
    #[error("{0}")]
    Input(#[from] InputError),

    /// Provider setup or call errors
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV results file errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Input errors that abort a command before it produces output.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Prompts file not found: {0}")]
    PromptsNotFound(PathBuf),

    #[error("Error reading prompts file {path}: {message}")]
    PromptsUnreadable { path: PathBuf, message: String },

    #[error("Prompts file {0} is empty or invalid")]
    PromptsEmpty(PathBuf),

    #[error("Image directory not found: {0}")]
    ImageDirNotFound(PathBuf),

    #[error("No valid images found in {0}")]
    NoImages(PathBuf),

    #[error("Could not find file {0}")]
    UsernameFileNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    UsernameFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("No usernames found in any file")]
    NoUsernames,
}

/// Errors from building or executing a completion call.
#[derive(Error, Debug)]
pub enum LlmError {
    /// The image could not be read for inlining
    #[error("Failed to read image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transport-level failure (DNS, connect, timeout)
    #[error("{provider} request failed: {message}")]
    Request { provider: String, message: String },

    /// Non-success HTTP status from the API
    #[error("{provider} HTTP {code}: {body}")]
    Status {
        provider: String,
        code: u16,
        body: String,
    },

    /// Response body did not decode
    #[error("Failed to parse {provider} response: {message}")]
    Parse { provider: String, message: String },

    /// Response decoded but carried no text
    #[error("{provider} returned no content")]
    EmptyResponse { provider: String },

    /// No cost estimate could be produced for a completed call
    #[error("Failed to calculate cost for {model}: {reason}")]
    CostUnavailable { model: String, reason: String },

    #[error("{provider} API key not set. Set {env_var} env var.")]
    MissingApiKey { provider: String, env_var: String },

    #[error("Unknown LLM provider for model '{0}'")]
    UnknownProvider(String),
}

impl LlmError {
    /// Short variant name used in error-marked result labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Image { .. } => "ImageError",
            Self::Request { .. } => "RequestError",
            Self::Status { .. } => "StatusError",
            Self::Parse { .. } => "ParseError",
            Self::EmptyResponse { .. } => "EmptyResponse",
            Self::CostUnavailable { .. } => "CostUnavailable",
            Self::MissingApiKey { .. } => "MissingApiKey",
            Self::UnknownProvider(_) => "UnknownProvider",
        }
    }
}

/// Convenience type alias for wdx results.
pub type Result<T> = std::result::Result<T, WdxError>;
