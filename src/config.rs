use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config error: {key} must be valid, got '{value}'")]
    Invalid { key: &'static str, value: String },
}

// --- CONFIG AGGREGATOR ---

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub stream: StreamConfig,
}

impl Config {
    /// Reads `.env` (if any) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Ok(Self {
            server: ServerConfig::load()?,
            stream: StreamConfig::load()?,
        })
    }
}

// --- MODULES ---

// SERVER
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub dashboard_port: u16,
    pub log_level: String,
    pub monitor_interval_secs: u64,
    pub demo_producer: bool,
    pub demo_interval_ms: u64,
}

impl ServerConfig {
    fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            host:                  get_env("SERVER_HOST", "127.0.0.1")?,
            dashboard_port:        get_env("DASHBOARD_PORT", "5050")?,
            log_level:             get_env("SERVER_LOG_LEVEL", "info")?,
            monitor_interval_secs: get_env("MONITOR_INTERVAL_SECS", "10")?,
            demo_producer:         get_env("DEMO_PRODUCER", "false")?,
            demo_interval_ms:      get_env("DEMO_INTERVAL_MS", "500")?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            dashboard_port: 5050,
            log_level: "info".to_string(),
            monitor_interval_secs: 10,
            demo_producer: false,
            demo_interval_ms: 500,
        }
    }
}

// STREAM
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Max retained messages for topics created without an explicit retention.
    pub default_retention: usize,
    /// When false, producing to or consuming from an unknown topic is an error.
    pub auto_create_topics: bool,
    pub default_poll_limit: usize,
    pub max_poll_limit: usize,
}

impl StreamConfig {
    fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            default_retention:  get_env("STREAM_DEFAULT_RETENTION", "10000")?,
            auto_create_topics: get_env("STREAM_AUTO_CREATE_TOPICS", "true")?,
            default_poll_limit: get_env("STREAM_DEFAULT_POLL_LIMIT", "100")?,
            max_poll_limit:     get_env("STREAM_MAX_POLL_LIMIT", "1000")?,
        })
    }

    /// Explicit-registration mode: topics must be created before use.
    pub fn strict() -> Self {
        Self { auto_create_topics: false, ..Self::default() }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            default_retention: 10_000,
            auto_create_topics: true,
            default_poll_limit: 100,
            max_poll_limit: 1000,
        }
    }
}

// --- PRIVATE HELPER ---

fn get_env<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}
