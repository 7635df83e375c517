//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then `LEAD_ENRICHER_*` environment variables. The CLI applies its own
//! overrides on top and calls [`Config::validate`] last.

use crate::constants::{
    APP_CONFIG_DIR, CONFIG_FILE_NAME, DEFAULT_DATA_FOLDER, DEFAULT_LOG_LEVEL, DEFAULT_RUNTIME,
    DEFAULT_SCRIPT_NAME, env_vars,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Folder holding lead CSVs, `jobs.db` and the scratch directory
    pub data_folder: PathBuf,

    /// Enrichment script settings
    pub enrichment: EnrichmentConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// How to run the enrichment script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Interpreter the script is passed to
    pub runtime: String,

    /// Script location
    pub script_path: PathBuf,

    /// Kill the script after this many seconds (0 = no limit)
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_folder: PathBuf::from(DEFAULT_DATA_FOLDER),
            enrichment: EnrichmentConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            runtime: DEFAULT_RUNTIME.to_string(),
            script_path: PathBuf::from(DEFAULT_SCRIPT_NAME),
            timeout_secs: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl EnrichmentConfig {
    /// Script timeout, `None` when unlimited
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Config {
    /// Default config file location (`<config dir>/lead-enricher/config.toml`)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            Error::configuration("Could not determine user configuration directory")
        })?;
        Ok(config_dir.join(APP_CONFIG_DIR).join(CONFIG_FILE_NAME))
    }

    /// Load a TOML config file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file '{}'", path.display()),
                e,
            )
        })?;

        toml::from_str(&content).map_err(|e| {
            Error::configuration(format!(
                "Invalid config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Defaults, then `config_file` if given, then environment variables
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;

        debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Apply `LEAD_ENRICHER_*` overrides read through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(folder) = lookup(env_vars::DATA_FOLDER) {
            self.data_folder = PathBuf::from(folder);
        }

        if let Some(script) = lookup(env_vars::SCRIPT) {
            self.enrichment.script_path = PathBuf::from(script);
        }

        if let Some(runtime) = lookup(env_vars::RUNTIME) {
            self.enrichment.runtime = runtime;
        }

        if let Some(timeout) = lookup(env_vars::TIMEOUT_SECS) {
            self.enrichment.timeout_secs = timeout.trim().parse().map_err(|_| {
                Error::configuration(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    env_vars::TIMEOUT_SECS,
                    timeout
                ))
            })?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.data_folder.as_os_str().is_empty() {
            return Err(Error::configuration("Data folder must not be empty"));
        }

        if self.enrichment.runtime.trim().is_empty() {
            return Err(Error::configuration("Enrichment runtime must not be empty"));
        }

        if self.enrichment.script_path.as_os_str().is_empty() {
            return Err(Error::configuration(
                "Enrichment script path must not be empty",
            ));
        }

        const LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
        if !LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::configuration(format!(
                "Invalid log level '{}', expected one of: {}",
                self.logging.level,
                LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}
