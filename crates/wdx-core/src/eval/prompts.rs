//! Named prompt sets loaded from YAML.

use crate::error::InputError;
use serde_yaml::Value;
use std::path::Path;

/// A single named prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub id: String,
    pub text: String,
}

/// Ordered, non-empty set of prompts in file order.
#[derive(Debug, Clone)]
pub struct PromptSet {
    prompts: Vec<Prompt>,
}

impl PromptSet {
    /// Load a `prompt_id: prompt text` mapping from a YAML file.
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                InputError::PromptsNotFound(path.to_path_buf())
            } else {
                InputError::PromptsUnreadable {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            }
        })?;
        Self::parse(&content, path)
    }

    /// Parse YAML content; `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, InputError> {
        let unreadable = |message: String| InputError::PromptsUnreadable {
            path: path.to_path_buf(),
            message,
        };

        let value: Value = serde_yaml::from_str(content).map_err(|e| unreadable(e.to_string()))?;

        let mapping = match value {
            Value::Null => return Err(InputError::PromptsEmpty(path.to_path_buf())),
            Value::Mapping(m) => m,
            _ => return Err(unreadable("expected a mapping of prompt id to text".into())),
        };

        let mut prompts = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let id = scalar_to_string(&key)
                .ok_or_else(|| unreadable("prompt ids must be plain scalars".into()))?;
            let text = scalar_to_string(&value)
                .ok_or_else(|| unreadable(format!("prompt '{id}' must be a text value")))?;
            prompts.push(Prompt { id, text });
        }

        if prompts.is_empty() {
            return Err(InputError::PromptsEmpty(path.to_path_buf()));
        }
        Ok(Self { prompts })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prompt> {
        self.prompts.iter()
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
