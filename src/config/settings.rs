//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming an alternate configuration file
pub const CONFIG_PATH_ENV: &str = "RENDER_SWEEP_CONFIG";

/// Environment variable that overrides `backend.base_url`
pub const BACKEND_URL_ENV: &str = "BACK_URL";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub dispatch: DispatchConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
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
    8080
}

/// Rendering backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound on a single render call, in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub fixed: FixedCoordinates,
}

fn default_base_url() -> String {
    "http://localhost:18080".to_string()
}

fn default_timeout() -> u64 {
    600_000
}

/// The five scene coordinates that stay constant across a sweep.
/// Only `s1x` varies per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct FixedCoordinates {
    pub s1y: i64,
    pub s1z: i64,
    pub s2x: i64,
    pub s2y: i64,
    pub s2z: i64,
}

impl Default for FixedCoordinates {
    fn default() -> Self {
        Self {
            s1y: 20,
            s1z: 50,
            s2x: 60,
            s2y: 30,
            s2z: 80,
        }
    }
}

/// Fan-out configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatchConfig {
    /// Maximum number of unit requests in flight for a single job
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_max_concurrent() -> usize {
    8
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config/default.toml".to_string());
        Self::load_from_path(path)
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let defaults = FixedCoordinates::default();
        let path = path.as_ref().to_str().ok_or_else(|| {
            AppError::Config(config::ConfigError::Message(
                "Configuration path is not valid UTF-8".to_string(),
            ))
        })?;

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("backend.base_url", default_base_url())?
            .set_default("backend.timeout_ms", default_timeout() as i64)?
            .set_default("backend.fixed.s1y", defaults.s1y)?
            .set_default("backend.fixed.s1z", defaults.s1z)?
            .set_default("backend.fixed.s2x", defaults.s2x)?
            .set_default("backend.fixed.s2y", defaults.s2y)?
            .set_default("backend.fixed.s2z", defaults.s2z)?
            .set_default("dispatch.max_concurrent", default_max_concurrent() as i64)?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            // Load from configuration file
            .add_source(File::with_name(path).required(false))
            // Override with environment variables (prefixed with RENDER_SWEEP__)
            .add_source(
                Environment::with_prefix("RENDER_SWEEP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("backend.base_url", std::env::var(BACKEND_URL_ENV).ok())?
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }

        let base_url = self.backend.base_url.trim();
        if base_url.is_empty() {
            return Err(invalid("Backend base URL cannot be empty"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(invalid(format!(
                "Backend base URL '{}' must start with http:// or https://",
                base_url
            )));
        }

        if self.backend.timeout_ms == 0 {
            return Err(invalid("Backend timeout cannot be 0"));
        }

        if self.dispatch.max_concurrent == 0 {
            return Err(invalid("dispatch.max_concurrent must be at least 1"));
        }

        if !["json", "plain"].contains(&self.logging.format.as_str()) {
            return Err(invalid(format!(
                "Invalid log format '{}'. Must be 'json' or 'plain'",
                self.logging.format
            )));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> AppError {
    AppError::Config(config::ConfigError::Message(message.into()))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            backend: BackendConfig {
                base_url: default_base_url(),
                timeout_ms: default_timeout(),
                fixed: FixedCoordinates::default(),
            },
            dispatch: DispatchConfig::default(),
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}
