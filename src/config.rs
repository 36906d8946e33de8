use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::services::AdvisorOptions;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub advisor: AdvisorSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_capacity() -> u64 { 10_000 }
fn default_cache_ttl() -> u64 { 300 }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    /// Attach a CRS estimate to every evaluation
    #[serde(default = "default_include_crs_estimate")]
    pub include_crs_estimate: bool,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            include_crs_estimate: default_include_crs_estimate(),
        }
    }
}

fn default_include_crs_estimate() -> bool { true }

/// Text-generation collaborator; advice is disabled without an endpoint and key
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorSettings {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_advisor_model")]
    pub model: String,
    #[serde(default = "default_advisor_temperature")]
    pub temperature: f32,
    #[serde(default = "default_advisor_timeout")]
    pub timeout_secs: u64,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model: default_advisor_model(),
            temperature: default_advisor_temperature(),
            timeout_secs: default_advisor_timeout(),
        }
    }
}

fn default_advisor_model() -> String { "gemini-2.5-flash".to_string() }
fn default_advisor_temperature() -> f32 { 0.7 }
fn default_advisor_timeout() -> u64 { 30 }

impl AdvisorSettings {
    /// Client options, if the advisor is configured
    pub fn options(&self) -> Option<AdvisorOptions> {
        let endpoint = self.endpoint.clone().filter(|e| !e.is_empty())?;
        let api_key = self.api_key.clone().filter(|k| !k.is_empty())?;

        Some(AdvisorOptions {
            endpoint,
            api_key,
            model: self.model.clone(),
            temperature: self.temperature,
            timeout_secs: self.timeout_secs,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with OINP__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., OINP__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("OINP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("OINP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
