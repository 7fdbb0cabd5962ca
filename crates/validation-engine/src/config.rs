/// Validation settings
/// Loads the engine's tunables from the environment or a TOML file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Default ceiling on nested object depth
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Largest accepted `max_depth`; deeper graphs risk exhausting the stack
pub const MAX_DEPTH_LIMIT: usize = 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Tunables for the traversal engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    pub max_depth: usize,
    /// Error cap; unlimited when absent
    pub max_errors: Option<usize>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_errors: None,
        }
    }
}

impl ValidationSettings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup("VALIDATION_MAX_DEPTH") {
            settings.max_depth = raw.trim().parse::<usize>().map_err(|e| {
                ConfigError::InvalidConfig(format!("Invalid max depth: {} ({})", raw, e))
            })?;
        }

        if let Some(raw) = lookup("VALIDATION_MAX_ERRORS") {
            let max_errors = raw.trim().parse::<usize>().map_err(|e| {
                ConfigError::InvalidConfig(format!("Invalid max errors: {} ({})", raw, e))
            })?;
            settings.max_errors = Some(max_errors);
        }

        settings.check()?;

        info!(
            "Validation settings loaded: max_depth={}, max_errors={:?}",
            settings.max_depth, settings.max_errors
        );

        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .context(format!("Failed to read settings file: {}", path.display()))?;
        let settings: Self = toml::from_str(&content).context("Failed to parse settings file")?;
        settings.check()?;

        info!(
            "Validation settings loaded from {}: max_depth={}, max_errors={:?}",
            path.display(),
            settings.max_depth,
            settings.max_errors
        );

        Ok(settings)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.max_depth < 1 || self.max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::InvalidConfig(format!(
                "max_depth must be between 1 and {}",
                MAX_DEPTH_LIMIT
            )));
        }
        if self.max_errors == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "max_errors must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
