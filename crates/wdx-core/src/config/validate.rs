//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.eval.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "eval.model must not be empty".into(),
            ));
        }
        if self.eval.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "eval.max_tokens must be > 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.eval.temperature) {
            return Err(ConfigError::ValidationError(
                "eval.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.eval.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "eval.supported_formats must list at least one extension".into(),
            ));
        }
        if self.limits.llm_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.llm_timeout_ms must be > 0".into(),
            ));
        }
        if self.usernames.batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "usernames.batch_size must be > 0".into(),
            ));
        }
        if !is_sql_identifier(&self.usernames.table) {
            return Err(ConfigError::ValidationError(format!(
                "usernames.table '{}' is not a valid SQL identifier",
                self.usernames.table
            )));
        }
        if !is_sql_identifier(&self.usernames.column) {
            return Err(ConfigError::ValidationError(format!(
                "usernames.column '{}' is not a valid SQL identifier",
                self.usernames.column
            )));
        }
        for (model, pricing) in &self.pricing {
            if pricing.input_per_million < 0.0 || pricing.output_per_million < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "pricing.\"{model}\" must not be negative"
                )));
            }
        }
        Ok(())
    }
}

/// Unquoted identifier, optionally schema-qualified (`public.username_pool`).
fn is_sql_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelPricing;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_max_tokens() {
        let mut config = Config::default();
        config.eval.max_tokens = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.limits.llm_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("llm_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_bad_table_name() {
        let mut config = Config::default();
        config.usernames.table = "username_pool; DROP TABLE users".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("usernames.table"));

        config.usernames.table = "public.username_pool".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_pricing() {
        let mut config = Config::default();
        config.pricing.insert(
            "gemini/custom".to_string(),
            ModelPricing {
                input_per_million: -1.0,
                output_per_million: 0.1,
            },
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("gemini/custom"));
    }

    #[test]
    fn test_sql_identifier() {
        assert!(is_sql_identifier("username_pool"));
        assert!(is_sql_identifier("_x1"));
        assert!(!is_sql_identifier("1abc"));
        assert!(!is_sql_identifier(""));
        assert!(!is_sql_identifier("a."));
    }
}
