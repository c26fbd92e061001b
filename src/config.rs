use crate::render::RenderMode;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
    /// Configuration was installed twice in the same process.
    #[error("Configuration already initialized")]
    AlreadyInitialized,
}

/// Runtime configuration for the docquery client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the server exposing `/upload` and `/query`.
    pub server_url: String,
    /// How successful query responses are rendered.
    pub render_mode: RenderMode,
    /// Optional text prepended to every submitted query.
    pub query_prefix: Option<String>,
    /// Optional per-request timeout; requests wait indefinitely when unset.
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            render_mode: RenderMode::default(),
            query_prefix: None,
            request_timeout: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset so that an empty line in `.env` falls back to the
    /// default instead of failing validation.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            server_url: optional("DOCQUERY_SERVER_URL")
                .map(|value| value.trim().to_string())
                .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            render_mode: optional("DOCQUERY_RENDER_MODE")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("DOCQUERY_RENDER_MODE".into()))
                })
                .transpose()?
                .unwrap_or_default(),
            // Not trimmed: trailing whitespace separates the prefix from the query text.
            query_prefix: optional("DOCQUERY_QUERY_PREFIX"),
            request_timeout: optional("DOCQUERY_REQUEST_TIMEOUT_SECS")
                .map(|value| {
                    value
                        .trim()
                        .parse::<u64>()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .map(Duration::from_secs)
                        .ok_or_else(|| {
                            ConfigError::InvalidValue("DOCQUERY_REQUEST_TIMEOUT_SECS".into())
                        })
                })
                .transpose()?,
        })
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment (after `.env`) and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        server_url = %config.server_url,
        render_mode = ?config.render_mode,
        has_query_prefix = config.query_prefix.is_some(),
        request_timeout = ?config.request_timeout,
        "Loaded configuration"
    );
    CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    Ok(get_config())
}
