//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field carries a serde default so an empty source still
//! yields a runnable configuration.

pub mod api_key;
pub mod cache;
pub mod logging;
pub mod rate_limit;
pub mod roles;
pub mod session;

use serde::{Deserialize, Serialize};

use self::api_key::ApiKeyConfig;
use self::cache::CacheConfig;
use self::logging::LoggingConfig;
use self::rate_limit::RateLimitConfig;
use self::roles::RoleConfig;
use self::session::SessionConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key validation settings.
    #[serde(default)]
    pub api_key: ApiKeyConfig,
    /// Session management settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Rate limiting policies and sweep cadence.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Role hierarchy and permission tables.
    #[serde(default)]
    pub roles: RoleConfig,
    /// Validation cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration, an environment-specific overlay,
    /// an optional machine-local overlay, and environment variables
    /// prefixed with `FARMGATE_`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("FARMGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
