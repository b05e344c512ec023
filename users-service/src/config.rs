//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: `USERS_`, nesting with `__`, e.g. `USERS_SERVICE__PORT=9090`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/users-service/config.toml
//! 4. System directory: /etc/users-service/config.toml
//! 5. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::validation::ValidationProfile;

const APP_NAME: &str = "users-service";
const ENV_PREFIX: &str = "USERS_";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const CORS_MODES: &[&str] = &["permissive", "restrictive", "disabled"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    #[serde(default)]
    pub service: ServiceConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,

    /// Payload validation configuration
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    #[serde(default = "default_name")]
    pub name: String,

    /// HTTP port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Prefix of `Location` headers and pagination links, e.g. `https://api.example.com`
    #[serde(default)]
    pub base_path: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            port: default_port(),
            log_level: default_log_level(),
            timeout_secs: default_timeout(),
            environment: default_environment(),
            base_path: String::new(),
        }
    }
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request tracking configuration (request IDs, header masking)
    #[serde(default)]
    pub request_tracking: RequestTrackingConfig,

    /// Request body size limit in MB
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// Enable panic recovery middleware
    #[serde(default = "default_true")]
    pub catch_panic: bool,

    /// Enable compression
    #[serde(default = "default_true")]
    pub compression: bool,

    /// CORS mode: permissive, restrictive or disabled
    #[serde(default = "default_cors_mode")]
    pub cors_mode: String,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            request_tracking: RequestTrackingConfig::default(),
            body_limit_mb: default_body_limit_mb(),
            catch_panic: true,
            compression: true,
            cors_mode: default_cors_mode(),
        }
    }
}

/// Request tracking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestTrackingConfig {
    /// Enable request ID generation
    #[serde(default = "default_true")]
    pub request_id_enabled: bool,

    /// Request ID header name
    #[serde(default = "default_request_id_header")]
    pub request_id_header: String,

    /// Enable sensitive header masking in logs
    #[serde(default = "default_true")]
    pub mask_sensitive_headers: bool,
}

impl Default for RequestTrackingConfig {
    fn default() -> Self {
        Self {
            request_id_enabled: true,
            request_id_header: default_request_id_header(),
            mask_sensitive_headers: true,
        }
    }
}

/// Payload validation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Require `firstName` and `lastName` when creating a user
    #[serde(default)]
    pub require_names_on_create: bool,
}

impl ValidationConfig {
    /// Profile applied to create payloads
    #[must_use]
    pub fn create_profile(&self) -> ValidationProfile {
        if self.require_names_on_create {
            ValidationProfile::Full
        } else {
            ValidationProfile::Minimal
        }
    }
}

fn default_name() -> String {
    APP_NAME.to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_body_limit_mb() -> usize {
    1
}

fn default_cors_mode() -> String {
    "permissive".to_string()
}

fn default_request_id_header() -> String {
    "x-request-id".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard locations
    ///
    /// Searches `./config.toml`, the XDG config directory and
    /// `/etc/users-service/config.toml`, then applies `USERS_` environment
    /// overrides. The result is validated before it is returned.
    pub fn load() -> Result<Self> {
        let config_paths = Self::find_config_paths();

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so that higher priority files override
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        let config: Config = figment.merge(Self::env()).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file, plus environment overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Self::env())
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    fn env() -> Env {
        Env::prefixed(ENV_PREFIX).split("__")
    }

    fn find_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME);
        if let Some(path) = xdg_dirs.find_config_file("config.toml") {
            paths.push(path);
        }

        paths.push(PathBuf::from("/etc").join(APP_NAME).join("config.toml"));
        paths
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.service.name.trim().is_empty() {
            return Err(Error::InvalidConfig("service.name must not be empty".into()));
        }
        if self.service.port == 0 {
            return Err(Error::InvalidConfig("service.port must not be 0".into()));
        }
        if !LOG_LEVELS.contains(&self.service.log_level.to_ascii_lowercase().as_str()) {
            return Err(Error::InvalidConfig(format!(
                "service.log_level '{}' is not one of {}",
                self.service.log_level,
                LOG_LEVELS.join(", ")
            )));
        }
        if self.middleware.body_limit_mb == 0 {
            return Err(Error::InvalidConfig(
                "middleware.body_limit_mb must be at least 1".into(),
            ));
        }
        if !CORS_MODES.contains(&self.middleware.cors_mode.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "middleware.cors_mode '{}' is not one of {}",
                self.middleware.cors_mode,
                CORS_MODES.join(", ")
            )));
        }
        Ok(())
    }

    /// Request timeout as a [`Duration`]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_secs)
    }

    /// Body limit in bytes
    #[must_use]
    pub fn body_limit_bytes(&self) -> usize {
        self.middleware.body_limit_mb.saturating_mul(1024 * 1024)
    }
}
