//! Runtime configuration read from the environment.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Gemini endpoint settings.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub const DEFAULT_MODEL: &'static str = "gemini-2.0-flash-exp";
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub gemini: GeminiConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - DATABASE_URL: PostgreSQL connection string
    /// - GEMINI_API_KEY: Generative Language API key
    ///
    /// Optional: HOST, PORT, GEMINI_MODEL, GEMINI_BASE_URL, GEMINI_TIMEOUT_SECS
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parsed("PORT", 3000)?;

        let gemini = GeminiConfig {
            api_key: required("GEMINI_API_KEY")?,
            model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| GeminiConfig::DEFAULT_MODEL.to_string()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| GeminiConfig::DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(parsed(
                "GEMINI_TIMEOUT_SECS",
                GeminiConfig::DEFAULT_TIMEOUT_SECS,
            )?),
        };

        Ok(Self {
            database_url,
            host,
            port,
            gemini,
        })
    }

    /// Address to bind, `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parsed<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
