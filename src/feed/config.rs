//! Feed server configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::selection::DEFAULT_SELECTION_SIZE;

const DEFAULT_BIND_ADDRESS: ([u8; 4], u16) = ([0, 0, 0, 0], 3000);
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";

/// Configuration for the feed server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedServerConfig {
    /// Server bind address
    pub bind_address: SocketAddr,

    /// Externally visible base URL, used in the sitemap and robots.txt
    pub public_base_url: String,

    /// Ads returned per feed request
    pub selection_size: usize,

    /// Catalog file (JSON or TOML); the built-in catalog is used when unset
    pub catalog_path: Option<PathBuf>,

    /// Seed for reproducible selections
    pub seed: Option<u64>,

    /// Enable CORS for API
    pub enable_cors: bool,

    /// Enable request logging
    pub enable_request_logging: bool,
}

impl Default for FeedServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(DEFAULT_BIND_ADDRESS),
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
            selection_size: DEFAULT_SELECTION_SIZE,
            catalog_path: None,
            seed: None,
            enable_cors: true,
            enable_request_logging: true,
        }
    }
}

impl FeedServerConfig {
    /// Create a new config builder
    pub fn builder() -> FeedServerConfigBuilder {
        FeedServerConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selection_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "selection_size".to_string(),
                reason: "Must select at least 1 ad".to_string(),
            });
        }

        if url::Url::parse(&self.public_base_url).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "public_base_url".to_string(),
                reason: format!("Invalid URL: {}", self.public_base_url),
            });
        }

        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.public_base_url.trim_end_matches('/')
    }
}

/// Builder for FeedServerConfig
#[derive(Debug, Default)]
pub struct FeedServerConfigBuilder {
    bind_address: Option<SocketAddr>,
    public_base_url: Option<String>,
    selection_size: Option<usize>,
    catalog_path: Option<PathBuf>,
    seed: Option<u64>,
    enable_cors: Option<bool>,
    enable_request_logging: Option<bool>,
}

impl FeedServerConfigBuilder {
    /// Set bind address
    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = Some(addr);
        self
    }

    /// Set bind address from string
    pub fn bind_address_str(mut self, addr: &str) -> Result<Self, ConfigError> {
        self.bind_address = Some(addr.parse().map_err(|_| ConfigError::InvalidValue {
            field: "bind_address".to_string(),
            reason: format!("Invalid address: {addr}"),
        })?);
        Ok(self)
    }

    /// Set public base URL
    pub fn public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into());
        self
    }

    /// Set ads per response
    pub fn selection_size(mut self, size: usize) -> Self {
        self.selection_size = Some(size);
        self
    }

    /// Set catalog path
    pub fn catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Set selection seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable/disable CORS
    pub fn enable_cors(mut self, enable: bool) -> Self {
        self.enable_cors = Some(enable);
        self
    }

    /// Enable/disable request logging
    pub fn enable_request_logging(mut self, enable: bool) -> Self {
        self.enable_request_logging = Some(enable);
        self
    }

    /// Build the config
    pub fn build(self) -> Result<FeedServerConfig, ConfigError> {
        let defaults = FeedServerConfig::default();
        let config = FeedServerConfig {
            bind_address: self.bind_address.unwrap_or(defaults.bind_address),
            public_base_url: self.public_base_url.unwrap_or(defaults.public_base_url),
            selection_size: self.selection_size.unwrap_or(defaults.selection_size),
            catalog_path: self.catalog_path,
            seed: self.seed,
            enable_cors: self.enable_cors.unwrap_or(defaults.enable_cors),
            enable_request_logging: self
                .enable_request_logging
                .unwrap_or(defaults.enable_request_logging),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
