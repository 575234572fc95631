//! Configuration loading and validation.
//!
//! Configuration comes from an optional YAML file passed via `--config`;
//! every field has a default so the tool runs without one.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::PipelineError;

/// Log levels accepted in the `log_level` field.
const LOG_LEVELS: [&str; 5] = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"];

/// Runtime configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root directory of the recording store.
    pub store_dir: PathBuf,
    /// Directory that receives generated description files.
    pub output_dir: PathBuf,
    /// Console log level: DEBUG, INFO, WARNING, ERROR, or CRITICAL.
    pub log_level: String,
    /// Event count above which generation asks for confirmation first.
    pub max_events: usize,
    /// Upper bound in bytes for a serialized description file.
    pub max_file_size: usize,
    /// Recording store access timeout, in seconds.
    pub db_timeout: u64,
    /// Per-call timeout for generation requests, in seconds.
    pub request_timeout: u64,
    /// Maximum generation calls in flight at once.
    pub max_in_flight: usize,
    /// Model identifier used for generation requests.
    pub model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(".recap"),
            output_dir: PathBuf::from("prompts"),
            log_level: "INFO".into(),
            max_events: 100,
            max_file_size: 10_000_000,
            db_timeout: 60,
            request_timeout: 30,
            max_in_flight: 4,
            model: "claude-sonnet-4-20250514".into(),
        }
    }
}

impl Config {
    /// Loads configuration from the given YAML file, or defaults when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if any
    /// field fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let cfg = match path {
            Some(p) => {
                let contents = std::fs::read_to_string(p).map_err(|e| {
                    PipelineError::Config(format!("cannot read {}: {e}", p.display()))
                })?;
                let cfg: Self = serde_yaml::from_str(&contents).map_err(|e| {
                    PipelineError::Config(format!("cannot parse {}: {e}", p.display()))
                })?;
                log::info!("using config from {}", p.display());
                cfg
            }
            None => Self::default(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), PipelineError> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(PipelineError::Config(format!("invalid log level: {}", self.log_level)));
        }
        if self.max_in_flight == 0 {
            return Err(PipelineError::Config("max_in_flight must be at least 1".into()));
        }
        if self.max_file_size == 0 {
            return Err(PipelineError::Config("max_file_size must be positive".into()));
        }
        Ok(())
    }

    /// Store access timeout as a [`Duration`].
    #[must_use]
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.db_timeout)
    }

    /// Generation request timeout as a [`Duration`].
    #[must_use]
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Maps the configured level onto the log facade's filter.
    ///
    /// CRITICAL collapses into the facade's Error level, which is its
    /// closest match.
    #[must_use]
    pub fn log_filter(&self) -> log::LevelFilter {
        match self.log_level.as_str() {
            "DEBUG" => log::LevelFilter::Debug,
            "WARNING" => log::LevelFilter::Warn,
            "ERROR" | "CRITICAL" => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        }
    }
}
