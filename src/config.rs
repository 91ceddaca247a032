//! Configuration module for Nicotine.
//!
//! Loads configuration from YAML files and environment variables.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Upstream OpenAI API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// API credential. Required: startup fails when it resolves empty.
    #[serde(default)]
    pub api_key: String,
    /// Base URL of the API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (NICOTINE__*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml
    ///
    /// The bare OPENAI_API_KEY variable is honored as the credential source
    /// when no layered value is present. Loading fails if the credential
    /// resolves empty: the service refuses to start without it.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config: Config = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("NICOTINE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        if config.openai.api_key.is_empty() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                config.openai.api_key = key;
            }
        }

        if config.openai.api_key.is_empty() {
            return Err(ConfigError::Message(
                "OPENAI_API_KEY is not set".to_string(),
            ));
        }

        Ok(config)
    }
}
