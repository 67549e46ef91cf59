//! Sampler configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with `QBATCH_` prefix)
//! 3. `.env` files
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::dispatch::FallbackMode;
use crate::error::SamplerResult;
use crate::identity::ExecutionIdentity;

const DEFAULT_MAX_IN_FLIGHT: usize = 4;

/// Complete sampler configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Automation run name; set together with `device_config_name` or not at all.
    pub run_name: String,

    /// Device configuration name.
    pub device_config_name: String,

    /// How per-circuit jobs are issued when repetitions differ.
    pub fallback: FallbackMode,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "console" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SamplerConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config = Self::from_yaml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        serde_yaml_ng::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Render configuration as YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml_ng::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    /// 3. Load .env file if it exists
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => SamplerConfig::default(),
        };

        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Merge `QBATCH_*` environment variables into this configuration.
    pub fn merge_env(self) -> Self {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Merge overrides from `lookup`, keyed by environment variable name.
    ///
    /// Only variables that are present override existing values.
    pub fn merge_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("QBATCH_RUN_NAME") {
            self.run_name = v;
        }
        if let Some(v) = lookup("QBATCH_DEVICE_CONFIG_NAME") {
            self.device_config_name = v;
        }

        let max_in_flight = lookup("QBATCH_MAX_IN_FLIGHT").and_then(|v| v.parse().ok());
        if let Some(mode) = lookup("QBATCH_FALLBACK") {
            match mode.to_lowercase().as_str() {
                "sequential" => self.fallback = FallbackMode::Sequential,
                "concurrent" => {
                    let current = match self.fallback {
                        FallbackMode::Concurrent { max_in_flight } => max_in_flight,
                        FallbackMode::Sequential => DEFAULT_MAX_IN_FLIGHT,
                    };
                    self.fallback = FallbackMode::Concurrent {
                        max_in_flight: max_in_flight.unwrap_or(current),
                    };
                }
                other => warn!("Ignoring unknown QBATCH_FALLBACK value: {other}"),
            }
        } else if let (FallbackMode::Concurrent { .. }, Some(n)) = (self.fallback, max_in_flight) {
            self.fallback = FallbackMode::Concurrent { max_in_flight: n };
        }

        if let Some(v) = lookup("QBATCH_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("QBATCH_LOG_FORMAT") {
            self.logging.format = v;
        }

        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run_name.is_empty() != self.device_config_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "run_name and device_config_name must be set together".to_string(),
            ));
        }

        if let FallbackMode::Concurrent { max_in_flight: 0 } = self.fallback {
            return Err(ConfigError::ValidationError(
                "fallback.max_in_flight must be at least 1".to_string(),
            ));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        match self.logging.format.as_str() {
            "console" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {other}"
                )));
            }
        }

        Ok(())
    }

    /// The execution identity described by this configuration.
    pub fn identity(&self) -> SamplerResult<ExecutionIdentity> {
        ExecutionIdentity::new(&self.run_name, &self.device_config_name)
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = SamplerConfig::default();
        assert!(config.run_name.is_empty());
        assert_eq!(config.fallback, FallbackMode::Sequential);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
        assert!(config.identity().unwrap().is_processor_default());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r"
run_name: nightly
device_config_name: config-a
fallback:
  mode: concurrent
  max_in_flight: 8
logging:
  level: debug
";
        let config = SamplerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.run_name, "nightly");
        assert_eq!(config.device_config_name, "config-a");
        assert_eq!(
            config.fallback,
            FallbackMode::Concurrent { max_in_flight: 8 }
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "console");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = SamplerConfig {
            run_name: "r".into(),
            device_config_name: "d".into(),
            ..Default::default()
        };
        let text = config.to_yaml().unwrap();
        assert_eq!(SamplerConfig::from_yaml(&text).unwrap(), config);
    }

    #[test]
    fn test_validate_half_identity() {
        let config = SamplerConfig {
            run_name: "nightly".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_zero_in_flight() {
        let config = SamplerConfig {
            fallback: FallbackMode::Concurrent { max_in_flight: 0 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = SamplerConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let config = SamplerConfig {
            run_name: "file-run".into(),
            device_config_name: "file-config".into(),
            ..Default::default()
        }
        .merge_vars(vars(&[
            ("QBATCH_RUN_NAME", "env-run"),
            ("QBATCH_LOG_FORMAT", "json"),
        ]));
        assert_eq!(config.run_name, "env-run");
        assert_eq!(config.device_config_name, "file-config");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_env_fallback_mode() {
        let config =
            SamplerConfig::default().merge_vars(vars(&[("QBATCH_FALLBACK", "concurrent")]));
        assert_eq!(
            config.fallback,
            FallbackMode::Concurrent {
                max_in_flight: DEFAULT_MAX_IN_FLIGHT
            }
        );

        let config = config.merge_vars(vars(&[("QBATCH_MAX_IN_FLIGHT", "2")]));
        assert_eq!(config.fallback, FallbackMode::Concurrent { max_in_flight: 2 });

        let config = config.merge_vars(vars(&[("QBATCH_FALLBACK", "sequential")]));
        assert_eq!(config.fallback, FallbackMode::Sequential);
    }

    #[test]
    fn test_unknown_fallback_ignored() {
        let config =
            SamplerConfig::default().merge_vars(vars(&[("QBATCH_FALLBACK", "eager")]));
        assert_eq!(config.fallback, FallbackMode::Sequential);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qbatch.yaml");
        std::fs::write(&path, "run_name: a\ndevice_config_name: b\n").unwrap();
        let config = SamplerConfig::from_file(&path).unwrap();
        assert_eq!(config.identity().unwrap().to_string(), "a/b");

        assert!(matches!(
            SamplerConfig::from_file(dir.path().join("missing.yaml")),
            Err(ConfigError::IoError(_))
        ));
    }
}
