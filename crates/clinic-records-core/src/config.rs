//! Runtime configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default tracing filter when neither the config nor the environment sets one.
pub const DEFAULT_LOG_FILTER: &str = "clinic_records_core=info";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Thresholds and logging settings. Missing keys take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecordsConfig {
    /// Patients younger than this need a guardian
    pub minor_age: i32,
    /// Patients older than this need a guardian
    pub elder_age: i32,
    /// Maximum closure reason length, in characters
    pub closure_reason_max_chars: usize,
    /// tracing-subscriber filter directive
    pub log_filter: String,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            minor_age: 18,
            elder_age: 64,
            closure_reason_max_chars: 500,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl RecordsConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.minor_age < 0 {
            return Err(ConfigError::Invalid("minor_age must not be negative".into()));
        }
        if self.elder_age <= self.minor_age {
            return Err(ConfigError::Invalid(format!(
                "elder_age ({}) must exceed minor_age ({})",
                self.elder_age, self.minor_age
            )));
        }
        if self.closure_reason_max_chars == 0 {
            return Err(ConfigError::Invalid(
                "closure_reason_max_chars must be positive".into(),
            ));
        }
        Ok(())
    }
}
