//! Unified error handling for the bannerwheel crate
//!
//! Each module keeps its own error enum; this module folds them into a
//! single [`Error`] for use across module boundaries.
//!
//! # Architecture
//!
//! - [`BannerErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use bannerwheel::error::{BannerErrorTrait, Error};
//!
//! fn handle_error(err: Error) {
//!     if err.is_recoverable() {
//!         tracing::warn!(category = ?err.category(), "{err}");
//!     } else {
//!         eprintln!("Fatal error: {err}");
//!     }
//! }
//! ```

use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::feed::{ConfigError, ServerError};
pub use crate::pool::CatalogError;
pub use crate::rotation::{FeedError, RotationError};

/// Common trait for all bannerwheel error types
pub trait BannerErrorTrait: std::error::Error {
    /// Check if this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Feed unreachable, timed out, or answered with an error status
    Network,
    /// Malformed JSON or TOML
    Decode,
    /// Configuration and validation errors
    Config,
    /// Catalog files and other I/O
    Storage,
    /// Rotation timer errors
    Scheduler,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Short human-readable label
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "network error",
            Self::Decode => "decode error",
            Self::Config => "configuration error",
            Self::Storage => "storage error",
            Self::Scheduler => "scheduler error",
            Self::Other => "other error",
        }
    }
}

impl BannerErrorTrait for FeedError {
    fn is_recoverable(&self) -> bool {
        FeedError::is_recoverable(self)
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Network(_) | Self::Status { .. } => ErrorCategory::Network,
            Self::Decode(_) => ErrorCategory::Decode,
            Self::Init(_) => ErrorCategory::Config,
        }
    }
}

impl BannerErrorTrait for RotationError {
    fn is_recoverable(&self) -> bool {
        // Stopping and starting again clears the only runtime failure
        matches!(self, Self::AlreadyRunning)
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::AlreadyRunning => ErrorCategory::Scheduler,
            Self::InvalidInterval(_) | Self::InvalidConfig { .. } => ErrorCategory::Config,
        }
    }
}

impl BannerErrorTrait for CatalogError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Io { .. } => ErrorCategory::Storage,
            Self::Json { .. } | Self::Toml { .. } => ErrorCategory::Decode,
            Self::UnsupportedFormat(_) => ErrorCategory::Config,
        }
    }
}

impl BannerErrorTrait for ServerError {
    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Bind { .. })
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) | Self::Template(_) => ErrorCategory::Config,
            Self::Catalog(e) => e.category(),
            Self::Bind { .. } | Self::Serve(_) => ErrorCategory::Network,
        }
    }
}

/// Unified error type for the bannerwheel crate
#[derive(Error, Debug)]
pub enum Error {
    /// Catalog loading errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Feed fetch errors
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    /// Rotation scheduler errors
    #[error("Rotation error: {0}")]
    Rotation(#[from] RotationError),

    /// Feed server errors
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl BannerErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Catalog(e) => e.is_recoverable(),
            Self::Feed(e) => BannerErrorTrait::is_recoverable(e),
            Self::Rotation(e) => e.is_recoverable(),
            Self::Server(e) => e.is_recoverable(),
            Self::Config(_) => false,
            Self::Other { .. } => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Catalog(e) => e.category(),
            Self::Feed(e) => e.category(),
            Self::Rotation(e) => e.category(),
            Self::Server(e) => e.category(),
            Self::Config(_) => ErrorCategory::Config,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

// Conversion from anyhow::Error
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other {
            context: err.to_string(),
            source: None,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_category() {
        let err = Error::Feed(FeedError::Status { status: 502 });
        assert_eq!(err.category(), ErrorCategory::Network);

        let err = Error::Feed(FeedError::Decode("expected array".into()));
        assert_eq!(err.category(), ErrorCategory::Decode);

        let err = Error::Rotation(RotationError::AlreadyRunning);
        assert_eq!(err.category(), ErrorCategory::Scheduler);
    }

    #[test]
    fn test_is_recoverable() {
        let err = Error::Feed(FeedError::Network("timed out".into()));
        assert!(err.is_recoverable());

        let err = Error::Catalog(CatalogError::UnsupportedFormat("yaml".into()));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_error_conversion() {
        let unified: Error = RotationError::AlreadyRunning.into();
        assert!(matches!(unified, Error::Rotation(_)));

        let unified: Error =
            FeedError::Init("request_timeout_ms must be greater than 0".into()).into();
        assert!(matches!(unified, Error::Feed(_)));
        assert_eq!(unified.category(), ErrorCategory::Config);
        assert!(!unified.is_recoverable());

        let unified: Error = ConfigError::InvalidValue {
            field: "selection_size".into(),
            reason: "must be greater than 0".into(),
        }
        .into();
        assert_eq!(unified.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_server_error_category_follows_catalog() {
        let err = ServerError::Catalog(CatalogError::Io {
            path: "ads.json".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        });
        assert_eq!(err.category(), ErrorCategory::Storage);
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("feed_url is empty");
        assert_eq!(err.category(), ErrorCategory::Config);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_other_error() {
        let err = Error::other("Something went wrong");
        assert_eq!(err.category(), ErrorCategory::Other);
        assert_eq!(ErrorCategory::Other.description(), "other error");
    }
}
