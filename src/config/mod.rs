//! Configuration management for bannerwheel
//!
//! This module handles loading and validating configuration from environment variables,
//! files, and command-line arguments.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::feed::FeedServerConfig;
use crate::rotation::RotationConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed server configuration
    pub server: FeedServerConfig,

    /// Rotation loop configuration
    pub rotation: RotationConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// `PORT` sets the listening port on all interfaces unless
    /// `BANNERWHEEL_BIND_ADDRESS` gives a full address.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let bind_address = env_parse::<SocketAddr>("BANNERWHEEL_BIND_ADDRESS")
            .or_else(|| {
                env_parse::<u16>("PORT").map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
            })
            .unwrap_or(defaults.server.bind_address);

        let public_base_url = std::env::var("BANNERWHEEL_PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", bind_address.port()));

        let selection_size = env_parse::<usize>("BANNERWHEEL_SELECTION_SIZE")
            .unwrap_or(defaults.server.selection_size);

        let catalog_path = std::env::var("BANNERWHEEL_CATALOG").ok().map(PathBuf::from);

        let seed = env_parse::<u64>("BANNERWHEEL_SEED");

        let feed_url = std::env::var("BANNERWHEEL_FEED_URL").unwrap_or_else(|_| {
            format!("http://localhost:{}/api/banner-ads", bind_address.port())
        });

        let interval_ms = env_parse::<u64>("BANNERWHEEL_INTERVAL_MS")
            .unwrap_or(defaults.rotation.interval_ms);

        let fade_delay_ms = env_parse::<u64>("BANNERWHEEL_FADE_DELAY_MS")
            .unwrap_or(defaults.rotation.fade_delay_ms);

        let request_timeout_ms = env_parse::<u64>("BANNERWHEEL_REQUEST_TIMEOUT_MS")
            .unwrap_or(defaults.rotation.request_timeout_ms);

        let retry_count = env_parse::<u32>("BANNERWHEEL_RETRY_COUNT")
            .unwrap_or(defaults.rotation.retry_count);

        let log_level =
            std::env::var("BANNERWHEEL_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));

        let log_format =
            std::env::var("BANNERWHEEL_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            server: FeedServerConfig {
                bind_address,
                public_base_url,
                selection_size,
                catalog_path,
                seed,
                ..defaults.server
            },
            rotation: RotationConfig {
                feed_url,
                interval_ms,
                fade_delay_ms,
                request_timeout_ms,
                retry_count,
                ..defaults.rotation
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from `path` when given, otherwise from the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_env(),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.server
            .validate()
            .context("Invalid server configuration")?;

        self.rotation
            .validate()
            .context("Invalid rotation configuration")?;

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("log format must be 'text' or 'json'");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use std::time::Duration;

    const ENV_KEYS: &[&str] = &[
        "PORT",
        "BANNERWHEEL_BIND_ADDRESS",
        "BANNERWHEEL_PUBLIC_URL",
        "BANNERWHEEL_SELECTION_SIZE",
        "BANNERWHEEL_CATALOG",
        "BANNERWHEEL_SEED",
        "BANNERWHEEL_FEED_URL",
        "BANNERWHEEL_INTERVAL_MS",
        "BANNERWHEEL_FADE_DELAY_MS",
        "BANNERWHEEL_REQUEST_TIMEOUT_MS",
        "BANNERWHEEL_RETRY_COUNT",
        "BANNERWHEEL_LOG_LEVEL",
        "BANNERWHEEL_LOG_FORMAT",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rotation.interval(), Duration::from_millis(5000));
    }

    #[test]
    fn test_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_nested_values() {
        let mut config = Config::default();
        config.server.selection_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.rotation.fade_opacity = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();

        assert_eq!(config.server.bind_address.port(), 3000);
        assert_eq!(config.server.seed, None);
        assert_eq!(
            config.rotation.feed_url,
            "http://localhost:3000/api/banner-ads"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_port() {
        clear_env();
        std::env::set_var("PORT", "8080");
        std::env::set_var("BANNERWHEEL_SEED", "42");
        std::env::set_var("BANNERWHEEL_INTERVAL_MS", "2000");

        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.server.bind_address, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.server.public_base_url, "http://localhost:8080");
        assert_eq!(config.server.seed, Some(42));
        assert_eq!(config.rotation.interval_ms, 2000);
        assert_eq!(
            config.rotation.feed_url,
            "http://localhost:8080/api/banner-ads"
        );
    }

    #[test]
    #[serial]
    fn test_from_env_bind_address_wins_over_port() {
        clear_env();
        std::env::set_var("PORT", "8080");
        std::env::set_var("BANNERWHEEL_BIND_ADDRESS", "127.0.0.1:9100");

        let config = Config::from_env().unwrap();
        clear_env();

        assert_eq!(config.server.bind_address, "127.0.0.1:9100".parse().unwrap());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
bind_address = "127.0.0.1:4000"
selection_size = 2

[rotation]
feed_url = "http://127.0.0.1:4000/api/banner-ads"
interval_ms = 1000

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.server.selection_size, 2);
        assert_eq!(config.rotation.interval_ms, 1000);
        assert_eq!(config.rotation.fade_delay_ms, 300);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file(Path::new("/nonexistent/bannerwheel.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
