//! Error types for the rotation client

use thiserror::Error;

/// Result type for rotation operations
pub type RotationResult<T> = Result<T, RotationError>;

/// Failures while fetching a selection from the feed
///
/// All variants are recovered inside a rotation cycle: the failure is logged
/// and the previously rendered banners stay in place.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Request could not be sent or timed out
    #[error("Network failure: {0}")]
    Network(String),

    /// Feed answered with a non-success status
    #[error("Feed returned HTTP {status}")]
    Status { status: u16 },

    /// Body was not a JSON array of ads
    #[error("Decode failure: {0}")]
    Decode(String),

    /// Client could not be constructed
    #[error("Client initialization failed: {0}")]
    Init(String),
}

impl FeedError {
    /// Whether the failure happened at the transport level
    ///
    /// Non-success statuses count as network failures, matching how the
    /// rotation loop treats them.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { .. })
    }

    /// Whether retrying could succeed
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Init(_))
    }
}

/// Scheduler and coordinator errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RotationError {
    /// `start` called while a timer is already registered
    #[error("Rotation scheduler is already running")]
    AlreadyRunning,

    /// Interval must be non-zero
    #[error("Invalid rotation interval: {0}")]
    InvalidInterval(String),

    /// Configuration value out of range
    #[error("Invalid value for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },
}

impl RotationError {
    /// Create an invalid configuration error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
