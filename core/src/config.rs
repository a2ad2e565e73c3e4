use serde::{Deserialize, Serialize};
use std::env::{self, VarError};
use tracing_subscriber::EnvFilter;

use crate::errors::ConfigError;

/// Environment variable holding the whole configuration as YAML.
pub const CONFIG_ENV_VAR: &str = "SERVICE_C_CONFIG";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    pub filter: String,
    /// CloudWatch renders escape codes literally, so this stays off in Lambda.
    pub ansi: bool,
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            ansi: false,
            with_target: true,
        }
    }
}

pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ServiceConfig> {
    match config_path {
        Some(path) => ServiceConfig::from_file(path),
        None => ServiceConfig::from_env(),
    }
}

impl ServiceConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Reads `SERVICE_C_CONFIG`. Unlike a file path, the variable is optional
    /// and its absence yields the defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_env_value(env::var(CONFIG_ENV_VAR))
    }

    fn from_env_value(value: Result<String, VarError>) -> anyhow::Result<Self> {
        match value {
            Ok(config_str) => Self::from_yaml_str(&config_str),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(_)) => Err(ConfigError::Invalid {
                message: format!("{CONFIG_ENV_VAR} is not valid unicode"),
            }
            .into()),
        }
    }

    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to unit, not to an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ServiceConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log.filter.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                reason: "Log filter cannot be empty".to_string(),
            });
        }
        EnvFilter::try_new(&self.log.filter).map_err(|e| ConfigError::ValidationFailed {
            reason: format!("Log filter '{}' is invalid: {}", self.log.filter, e),
        })?;
        Ok(())
    }
}
