//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::answer::{normalize, SynonymTable};
use crate::parse_duration;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Evaluation loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How often watch loops re-evaluate, e.g. "1s"
    #[serde(default = "default_tick_interval")]
    pub tick_interval: String,
}

fn default_tick_interval() -> String {
    "1s".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: default_tick_interval(),
        }
    }
}

impl EngineConfig {
    pub fn tick_interval(&self) -> Option<Duration> {
        parse_duration(&self.tick_interval).filter(|d| !d.is_zero())
    }
}

/// Answer checking settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswersConfig {
    /// Extra alternatives merged into the builtin synonym table
    #[serde(default)]
    pub extra_synonyms: BTreeMap<String, Vec<String>>,
}

impl AnswersConfig {
    pub fn synonym_table(&self) -> SynonymTable {
        SynonymTable::builtin().with_extra(self.extra_synonyms.clone())
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub answers: AnswersConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            engine: EngineConfig::default(),
            answers: AnswersConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!("No config file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.engine.tick_interval().is_none() {
            return Err(ConfigError::ValidationError(format!(
                "Tick interval must be a positive duration like \"1s\", got {:?}",
                self.engine.tick_interval
            )));
        }

        for (key, values) in &self.answers.extra_synonyms {
            if normalize(key).is_empty() {
                return Err(ConfigError::ValidationError(
                    "Synonym keys must not be blank".to_string(),
                ));
            }
            if values.iter().any(|v| normalize(v).is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "Synonyms for {:?} must not be blank",
                    key
                )));
            }
        }

        Ok(())
    }
}
