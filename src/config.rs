//! Store configuration loaded from TOML files and environment variables.

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable prefix for configuration overrides.
const ENV_PREFIX: &str = "FUSION_CACHE";

/// Separator for nested configuration keys in environment variables.
const ENV_SEPARATOR: &str = "__";

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator(ENV_SEPARATOR)
        .ignore_empty(true)
        .try_parsing(true)
}

// ============================================================================
// Default value functions
// ============================================================================

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> String {
    "6379".to_string()
}

fn default_pool_size() -> u32 {
    4
}

fn default_connect_timeout() -> u64 {
    5
}

/// Connection settings for the Redis server backing the store.
///
/// Every field has a default, so `RedisConfig::default()` connects to a
/// local unauthenticated server with no key prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Prefix prepended verbatim to every logical key. No separator is
    /// inserted; callers avoid prefix/key collisions themselves.
    #[serde(default)]
    pub prefix: String,

    /// Server host name or address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Server TCP port.
    #[serde(default = "default_port")]
    pub port: String,

    /// Database index selected after connecting.
    #[serde(default)]
    pub db: i64,

    /// Server password. Empty means no authentication.
    #[serde(default)]
    pub password: String,

    /// Connection pool size.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Pool checkout timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            host: default_host(),
            port: default_port(),
            db: 0,
            password: String::new(),
            pool_size: default_pool_size(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl RedisConfig {
    /// Load configuration from a TOML file, overlaid with `FUSION_CACHE_*`
    /// environment variables (highest priority).
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::new(path, FileFormat::Toml))
            .add_source(env_source())
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Load configuration from `FUSION_CACHE_*` environment variables only.
    ///
    /// Unset fields fall back to their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config::builder().add_source(env_source()).build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check the configuration for values the server would reject.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::validation("host", "must not be empty"));
        }
        if self.port.parse::<u16>().is_err() {
            return Err(ConfigError::validation("port", "must be a TCP port number"));
        }
        if self.db < 0 {
            return Err(ConfigError::validation("db", "must not be negative"));
        }
        if self.pool_size == 0 {
            return Err(ConfigError::validation("pool_size", "must be at least 1"));
        }

        Ok(())
    }

    /// Assemble the connection URL for the redis client.
    pub fn url(&self) -> String {
        if self.password.is_empty() {
            format!("redis://{}:{}/{}", self.host, self.port, self.db)
        } else {
            format!(
                "redis://:{}@{}:{}/{}",
                self.password, self.host, self.port, self.db
            )
        }
    }
}

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Validation error with field and message
    #[error("Validation error: {field} - {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// The validation error message
        message: String,
    },

    /// Generic configuration error from config crate
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        ConfigError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RedisConfig::default();
        assert_eq!(config.prefix, "");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, "6379");
        assert_eq!(config.db, 0);
        assert_eq!(config.password, "");
        assert_eq!(config.pool_size, 4);
        assert_eq!(config.connect_timeout, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_url_without_password() {
        let config = RedisConfig::default();
        assert_eq!(config.url(), "redis://127.0.0.1:6379/0");
    }

    #[test]
    fn test_url_with_password_and_db() {
        let config = RedisConfig {
            password: "hunter2".to_string(),
            db: 3,
            ..Default::default()
        };
        assert_eq!(config.url(), "redis://:hunter2@127.0.0.1:6379/3");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let empty_host = RedisConfig {
            host: String::new(),
            ..Default::default()
        };
        assert!(empty_host.validate().is_err());

        let bad_port = RedisConfig {
            port: "not-a-port".to_string(),
            ..Default::default()
        };
        assert!(bad_port.validate().is_err());

        let negative_db = RedisConfig {
            db: -1,
            ..Default::default()
        };
        assert!(negative_db.validate().is_err());

        let zero_pool = RedisConfig {
            pool_size: 0,
            ..Default::default()
        };
        assert!(zero_pool.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "prefix = \"app:\"\nhost = \"redis.internal\"\nport = \"6380\"\ndb = 2"
        )
        .unwrap();

        let config = RedisConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.prefix, "app:");
        assert_eq!(config.host, "redis.internal");
        assert_eq!(config.port, "6380");
        assert_eq!(config.db, 2);
        // Unspecified fields keep their defaults
        assert_eq!(config.password, "");
        assert_eq!(config.pool_size, 4);
    }

    #[test]
    fn test_from_file_missing() {
        assert!(RedisConfig::from_file("definitely/not/here.toml").is_err());
    }

    proptest! {
        #[test]
        fn url_embeds_host_port_and_db(
            host in "[a-z][a-z0-9.-]{0,20}",
            port in 1u16..=65535,
            db in 0i64..16,
        ) {
            let config = RedisConfig {
                host: host.clone(),
                port: port.to_string(),
                db,
                ..Default::default()
            };
            prop_assert!(config.validate().is_ok());
            prop_assert_eq!(config.url(), format!("redis://{}:{}/{}", host, port, db));
        }
    }
}
