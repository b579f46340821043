//! TOML-based service configuration.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::service::MAX_CHARGING_HOURS;

/// Top-level configuration parsed from TOML.
///
/// Every section and field has a default, so an empty file is a valid
/// configuration. Load with [`AppConfig::from_toml_file`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Generation-mix feed settings.
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Daily summary horizon.
    #[serde(default)]
    pub generation_mix: GenerationMixConfig,
    /// Charging window search horizon.
    #[serde(default)]
    pub optimization: OptimizationConfig,
    /// Upstream response cache.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_address: String,
    /// Port to bind (must be > 0).
    pub port: u16,
    /// Browser origin allowed by CORS; empty disables the CORS layer.
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origin: "http://localhost:4200".to_string(),
        }
    }
}

/// Generation-mix feed settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Feed base URL, without the `/generation` path.
    pub base_url: String,
    /// Per-request timeout in seconds (must be > 0).
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.carbonintensity.org.uk".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationMixConfig {
    /// Number of calendar days to summarize, starting today (must be > 0).
    pub days: u32,
}

impl Default for GenerationMixConfig {
    fn default() -> Self {
        Self { days: 3 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizationConfig {
    /// Length of the rolling search horizon in hours.
    pub search_window_hours: u32,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            search_window_hours: 48,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Whether upstream responses are memoized per time range.
    pub enabled: bool,
    /// Seconds an entry stays valid (must be > 0 when enabled).
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 900,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"generation_mix.days"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl AppConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push(ConfigError {
                field: "server.port".into(),
                message: "must be > 0".into(),
            });
        }

        let up = &self.upstream;
        if !(up.base_url.starts_with("http://") || up.base_url.starts_with("https://")) {
            errors.push(ConfigError {
                field: "upstream.base_url".into(),
                message: format!("must be an http(s) URL, got \"{}\"", up.base_url),
            });
        }
        if up.timeout_secs == 0 {
            errors.push(ConfigError {
                field: "upstream.timeout_secs".into(),
                message: "must be > 0".into(),
            });
        }

        if self.generation_mix.days == 0 {
            errors.push(ConfigError {
                field: "generation_mix.days".into(),
                message: "must be > 0".into(),
            });
        }

        if self.optimization.search_window_hours < MAX_CHARGING_HOURS {
            errors.push(ConfigError {
                field: "optimization.search_window_hours".into(),
                message: format!("must be >= {MAX_CHARGING_HOURS} to fit the longest charging window"),
            });
        }

        if self.cache.enabled && self.cache.ttl_secs == 0 {
            errors.push(ConfigError {
                field: "cache.ttl_secs".into(),
                message: "must be > 0 when the cache is enabled".into(),
            });
        }

        errors
    }
}
