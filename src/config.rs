//! Runtime configuration: channel capacities and log output.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Capacities of the actor queues and the subscriber channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Request queue of the product actor.
    pub product_buffer: usize,
    /// Request queue of the cart actor.
    pub cart_buffer: usize,
    /// Subscribe request queue of the notifier. Changes are never bounded by it.
    pub notifier_buffer: usize,
    /// Per-subscriber event channel; a subscriber that falls this far behind is dropped.
    pub subscriber_buffer: usize,
    pub log_format: LogFormat,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            product_buffer: 32,
            cart_buffer: 32,
            notifier_buffer: 64,
            subscriber_buffer: 16,
            log_format: LogFormat::Compact,
        }
    }
}

impl SystemConfig {
    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SystemConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Tokio channels panic on a capacity of zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("product_buffer", self.product_buffer),
            ("cart_buffer", self.cart_buffer),
            ("notifier_buffer", self.notifier_buffer),
            ("subscriber_buffer", self.subscriber_buffer),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be at least 1")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(SystemConfig::from_toml_str("").unwrap(), SystemConfig::default());
    }

    #[test]
    fn partial_document_overrides_only_its_keys() {
        let config = SystemConfig::from_toml_str(
            r#"
            subscriber_buffer = 2
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.subscriber_buffer, 2);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.product_buffer, 32);
    }

    #[test]
    fn zero_capacity_and_bad_values_are_rejected() {
        assert!(matches!(
            SystemConfig::from_toml_str("cart_buffer = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SystemConfig::from_toml_str("log_format = \"xml\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SystemConfig::load("/nonexistent/storefront.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
