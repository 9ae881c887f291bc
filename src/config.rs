//! Configuration management for the prediction service and gateway
//!
//! Resolution order: built-in defaults, then `config/config.toml` when
//! present, then the `MODEL_REPO`, `PORT` and `PREDICTOR_API` environment
//! variables.

use crate::features::UnknownFeaturePolicy;
use crate::models::loader::ModelLocation;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Directory holding the model artifact
pub const MODEL_REPO_ENV: &str = "MODEL_REPO";
/// Listening port of whichever binary is running
pub const PORT_ENV: &str = "PORT";
/// Prediction service URL used by the gateway
pub const PREDICTOR_API_ENV: &str = "PREDICTOR_API";

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
pub const DEFAULT_MODEL_FILENAME: &str = "heart_disease_model.onnx";

/// Main application configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub reconciliation: ReconciliationConfig,
    pub gateway: GatewayConfig,
    pub metrics: MetricsConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads (0 = one per CPU core)
    pub workers: usize,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Directory containing the artifact; unset means use `fallback_path`
    #[serde(default)]
    pub directory: Option<String>,
    /// Artifact file name inside `directory`
    pub filename: String,
    /// Artifact path used when no directory is configured
    pub fallback_path: String,
    /// Scores above this are labelled positive
    pub decision_threshold: f64,
    /// Load the model at startup instead of on the first request
    pub preload: bool,
}

impl ModelConfig {
    pub fn location(&self) -> ModelLocation {
        ModelLocation::new(
            self.directory.as_ref().map(PathBuf::from),
            self.filename.clone(),
            PathBuf::from(&self.fallback_path),
        )
    }
}

/// Feature reconciliation configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReconciliationConfig {
    /// "ignore" or "reject" submitted features the model does not declare
    #[serde(default)]
    pub unknown_features: UnknownFeaturePolicy,
}

/// Intake gateway configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GatewayConfig {
    /// Prediction service endpoint
    pub predictor_api: String,
    /// Upstream request timeout in milliseconds
    pub timeout_ms: u64,
}

/// Metrics configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MetricsConfig {
    /// Seconds between summaries (0 disables the reporter)
    pub report_interval_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from the default file and the process environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path and the process environment
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Load configuration with an explicit environment lookup.
    ///
    /// The file is optional; a missing file leaves the defaults in place.
    pub fn load_with_env<P, F>(path: P, env: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let config = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("server.workers", defaults.server.workers as i64)?
            .set_default("model.filename", defaults.model.filename)?
            .set_default("model.fallback_path", defaults.model.fallback_path)?
            .set_default("model.decision_threshold", defaults.model.decision_threshold)?
            .set_default("model.preload", defaults.model.preload)?
            .set_default("reconciliation.unknown_features", "ignore")?
            .set_default("gateway.predictor_api", defaults.gateway.predictor_api)?
            .set_default("gateway.timeout_ms", defaults.gateway.timeout_ms as i64)?
            .set_default(
                "metrics.report_interval_secs",
                defaults.metrics.report_interval_secs as i64,
            )?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .add_source(File::from(path.as_ref()).required(false))
            .set_override_option("model.directory", env(MODEL_REPO_ENV))?
            .set_override_option("server.port", env(PORT_ENV))?
            .set_override_option("gateway.predictor_api", env(PREDICTOR_API_ENV))?
            .build()
            .context("Failed to build configuration")?;

        let config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values no component can work with
    pub fn validate(&self) -> Result<()> {
        let threshold = self.model.decision_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            anyhow::bail!("model.decision_threshold must be within [0, 1], got {}", threshold);
        }
        if self.model.filename.is_empty() {
            anyhow::bail!("model.filename must not be empty");
        }
        if self.gateway.predictor_api.is_empty() {
            anyhow::bail!("gateway.predictor_api must not be empty");
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                workers: 0,
            },
            model: ModelConfig {
                directory: None,
                filename: DEFAULT_MODEL_FILENAME.to_string(),
                fallback_path: DEFAULT_MODEL_FILENAME.to_string(),
                decision_threshold: 0.5,
                preload: false,
            },
            reconciliation: ReconciliationConfig {
                unknown_features: UnknownFeaturePolicy::Ignore,
            },
            gateway: GatewayConfig {
                predictor_api: "http://localhost:5000/heart_disease_predictor/".to_string(),
                timeout_ms: 5000,
            },
            metrics: MetricsConfig {
                report_interval_secs: 0,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
