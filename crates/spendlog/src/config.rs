//! Configuration loading

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use spendlog_auth::{DEFAULT_TOKEN_TTL_HOURS, MAX_TOKEN_TTL_HOURS};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Token signing secret; a random one is generated per process when unset
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> String {
    "./data/spendlog.db".to_string()
}

fn default_token_ttl_hours() -> i64 {
    DEFAULT_TOKEN_TTL_HOURS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    Defaults,
}

impl Config {
    /// Load configuration from a file
    ///
    /// Runs before logging is initialised, so the caller reports the
    /// returned [`ConfigSource`] once the subscriber is installed.
    pub fn load(path: &str) -> Result<(Self, ConfigSource)> {
        let config_path = Path::new(path);

        // Check if config file exists
        if !config_path.exists() {
            return Ok((Self::default(), ConfigSource::Defaults));
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path))?;

        Ok((config, ConfigSource::File))
    }

    /// Check values that parse but cannot be used
    pub fn validate(&self) -> Result<()> {
        let ttl = self.auth.token_ttl_hours;
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&ttl) {
            anyhow::bail!(
                "auth.token_ttl_hours must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_HOURS,
                ttl
            );
        }
        Ok(())
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert!(config.auth.jwt_secret.is_none());
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_config_overrides() {
        let config = Config::parse(
            r#"
            [server]
            port = 9000

            [auth]
            jwt_secret = "pinned"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.auth.jwt_secret.as_deref(), Some("pinned"));
        assert_eq!(config.auth.token_ttl_hours, 24);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let (config, source) = Config::load("/nonexistent/spendlog.toml").unwrap();
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(config.database.path, "./data/spendlog.db");
    }

    #[test]
    fn test_token_ttl_bounds() {
        for ttl in [0, -1, MAX_TOKEN_TTL_HOURS + 1, 1_000_000_000_000, i64::MAX] {
            let config = Config::parse(&format!("[auth]\ntoken_ttl_hours = {}", ttl)).unwrap();
            assert!(config.validate().is_err(), "ttl {} accepted", ttl);
        }

        for ttl in [1, DEFAULT_TOKEN_TTL_HOURS, MAX_TOKEN_TTL_HOURS] {
            let config = Config::parse(&format!("[auth]\ntoken_ttl_hours = {}", ttl)).unwrap();
            assert!(config.validate().is_ok(), "ttl {} rejected", ttl);
        }
    }

    #[test]
    fn test_load_reports_file_source_and_rejects_huge_ttl() {
        let dir = std::env::temp_dir().join(format!("spendlog-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let good = dir.join("good.toml");
        std::fs::write(&good, "[auth]\ntoken_ttl_hours = 48\n").unwrap();
        let (config, source) = Config::load(good.to_str().unwrap()).unwrap();
        assert_eq!(source, ConfigSource::File);
        assert_eq!(config.auth.token_ttl_hours, 48);

        let huge = dir.join("huge.toml");
        std::fs::write(&huge, "[auth]\ntoken_ttl_hours = 1000000000000\n").unwrap();
        assert!(Config::load(huge.to_str().unwrap()).is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
