//! Configuration management for wdx.
//!
//! Configuration is loaded from the platform config directory with defaults
//! that reproduce the stock evaluation setup (Gemini 2.0 Flash, `prompts.yaml`,
//! `eval_images/`) and the `username_pool` seeding schema.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Root configuration structure for wdx.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Evaluation run settings
    pub eval: EvalConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Username pool SQL settings
    pub usernames: UsernamesConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Per-model pricing overrides, keyed by `provider/model`
    pub pricing: BTreeMap<String, ModelPricing>,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// - macOS: ~/Library/Application Support/com.worlddex.wdx/config.toml
    /// - Linux: ~/.config/wdx/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\worlddex\wdx\config\config.toml
    ///
    /// Falls back to ~/.wdx/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "worlddex", "wdx")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".wdx").join("config.toml")
            })
    }

    /// Resolved prompts file path (with ~ expansion).
    pub fn prompts_file(&self) -> PathBuf {
        expand(&self.eval.prompts_file)
    }

    /// Resolved image directory path (with ~ expansion).
    pub fn image_dir(&self) -> PathBuf {
        expand(&self.eval.image_dir)
    }

    /// Resolved results directory path (with ~ expansion).
    pub fn output_dir(&self) -> PathBuf {
        expand(&self.eval.output_dir)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&path_str).into_owned())
}
