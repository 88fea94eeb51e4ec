//! Service settings loaded from the environment.
//!
//! Every key falls back to a default, so a service starts with no
//! configuration at all:
//!
//! | Variable              | Default |
//! |-----------------------|---------|
//! | `SERVICE_NAME`        | `api`   |
//! | `SERVICE_PATH_PREFIX` | `/api`  |
//! | `SERVICE_VERSION`     | `v1`    |
//! | `SERVICE_PORT`        | `8080`  |
//! | `SERVICE_DEBUG`       | `false` |
//!
//! # Example
//!
//! ```no_run
//! use apicore_web::config::ServiceSettings;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ServiceSettings::from_env()?;
//! settings.validate()?;
//!
//! println!("Listening on {}", settings.bind_address());
//! println!("Users at {}", settings.prefixed("/users"));
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Environment key for the service name.
pub const ENV_NAME: &str = "SERVICE_NAME";
/// Environment key for the route prefix.
pub const ENV_PATH_PREFIX: &str = "SERVICE_PATH_PREFIX";
/// Environment key for the API version.
pub const ENV_VERSION: &str = "SERVICE_VERSION";
/// Environment key for the listening port.
pub const ENV_PORT: &str = "SERVICE_PORT";
/// Environment key for debug mode.
pub const ENV_DEBUG: &str = "SERVICE_DEBUG";

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("Failed to parse {key}: {value:?}")]
    Parse {
        /// Environment key
        key: String,
        /// Raw value
        value: String,
    },
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

/// Settings shared by every service built on this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Service name, used in logs.
    pub name: String,
    /// Prefix for every route, e.g. `/api`.
    pub path_prefix: String,
    /// API version segment, e.g. `v1`.
    pub version: String,
    /// Listening port.
    pub port: u16,
    /// Debug mode.
    pub debug: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "api".to_string(),
            path_prefix: "/api".to_string(),
            version: "v1".to_string(),
            port: 8080,
            debug: false,
        }
    }
}

impl ServiceSettings {
    /// Load settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns error if `SERVICE_PORT` or `SERVICE_DEBUG` cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`, which maps a key to its value.
    ///
    /// # Errors
    ///
    /// Returns error if the port or debug value cannot be parsed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            name: env_or(&lookup, ENV_NAME, defaults.name)?,
            path_prefix: env_or(&lookup, ENV_PATH_PREFIX, defaults.path_prefix)?,
            version: env_or(&lookup, ENV_VERSION, defaults.version)?,
            port: env_or(&lookup, ENV_PORT, defaults.port)?,
            debug: env_or(&lookup, ENV_DEBUG, defaults.debug)?,
        })
    }

    /// Validate settings
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty, the prefix does not start with
    /// `/`, or the port is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Validation("name cannot be empty".to_string()));
        }
        if !self.path_prefix.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "path_prefix must start with '/': {}",
                self.path_prefix
            )));
        }
        if self.port == 0 {
            return Err(ConfigError::Validation("port must be > 0".to_string()));
        }
        Ok(())
    }

    /// Address to bind the listener to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Join `path` onto the route prefix.
    #[must_use]
    pub fn prefixed(&self, path: &str) -> String {
        let prefix = self.path_prefix.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return prefix.to_string();
        }
        format!("{prefix}/{path}")
    }

    /// Set the service name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the route prefix
    #[must_use]
    pub fn with_path_prefix(mut self, path_prefix: impl Into<String>) -> Self {
        self.path_prefix = path_prefix.into();
        self
    }

    /// Set the API version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the listening port
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable or disable debug mode
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Read `key` through `lookup`, falling back when unset or blank.
fn env_or<F, T>(lookup: &F, key: &str, fallback: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|_| ConfigError::Parse {
                key: key.to_string(),
                value: raw,
            })
        }
        _ => Ok(fallback),
    }
}
