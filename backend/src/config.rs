//! Configuration management for the Weather Insight Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WI_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Weather data source configuration
    pub data_source: DataSourceConfig,

    /// Advisory text generation configuration
    pub advisory: AdvisoryConfig,

    /// Extreme analysis configuration
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

/// Which weather data source backs the pipeline
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceKind {
    /// Deterministic seeded generator
    Synthetic,
    /// Open-Meteo daily archive/forecast API
    OpenMeteo,
}

impl DataSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSourceKind::Synthetic => "synthetic",
            DataSourceKind::OpenMeteo => "open_meteo",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSourceConfig {
    pub kind: DataSourceKind,

    /// Seed for the synthetic generator
    pub seed: u64,

    /// Upper bound on a single series fetch
    pub timeout_secs: u64,

    /// Open-Meteo archive API base URL, for windows ending before today
    pub archive_url: String,

    /// Open-Meteo forecast API base URL, for windows reaching today or later
    pub forecast_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdvisoryConfig {
    /// Generative language API endpoint
    pub api_endpoint: String,

    /// API key; advisory falls back to a local template when absent
    pub api_key: Option<String>,

    /// Model name
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AnalysisConfig {
    /// Optional TOML/JSON file overriding the default policy table
    pub policy_file: Option<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("WI_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let mut builder = Self::builder_with_defaults(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WI_ prefix)
            .add_source(
                Environment::with_prefix("WI")
                    .separator("__")
                    .try_parsing(true),
            );

        // Conventional variable name for the Gemini key
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if std::env::var("WI__ADVISORY__API_KEY").is_err() && !key.trim().is_empty() {
                builder = builder.set_override("advisory.api_key", key)?;
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Defaults only, without files or environment
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder_with_defaults("test")?.build()?.try_deserialize()
    }

    fn builder_with_defaults(
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        config::Config::builder()
            // Start with default values
            .set_default("environment", environment)?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("data_source.kind", "synthetic")?
            .set_default("data_source.seed", 42)?
            .set_default("data_source.timeout_secs", 10)?
            .set_default("data_source.archive_url", "https://archive-api.open-meteo.com/v1")?
            .set_default("data_source.forecast_url", "https://api.open-meteo.com/v1")?
            .set_default(
                "advisory.api_endpoint",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("advisory.model", "gemini-pro")?
            .set_default("advisory.timeout_secs", 15)
    }

    pub fn advisory_configured(&self) -> bool {
        self.advisory
            .api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
