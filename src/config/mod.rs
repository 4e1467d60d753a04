//! Configuration loading and management

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};

/// What to do with input fields the schema does not declare
///
/// The default is `Ignore` for backward compatibility with handlers that
/// silently dropped undeclared query parameters. Enforcement only covers
/// the query, form, and body buckets; header and cookie buckets always
/// carry undeclared entries from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    #[default]
    Ignore,
    Reject,
}

/// Complete configuration for the validation gate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    /// Policy for input names not declared by a schema
    #[serde(default)]
    pub unknown_fields: UnknownFieldPolicy,
}

impl GateConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}
