//! Rotation client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::{RotationError, RotationResult};

/// Default time between rotation ticks
pub const DEFAULT_INTERVAL_MS: u64 = 5_000;

/// Default pause between fading out and fetching
pub const DEFAULT_FADE_DELAY_MS: u64 = 300;

/// Default container opacity while faded out
pub const DEFAULT_FADE_OPACITY: f32 = 0.3;

/// Configuration for the rotation loop and its feed client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Absolute URL of the banner feed
    pub feed_url: String,

    /// Milliseconds between ticks
    pub interval_ms: u64,

    /// Milliseconds between fade-out and fetch
    pub fade_delay_ms: u64,

    /// Opacity applied while a cycle is in progress
    pub fade_opacity: f32,

    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Extra attempts after a failed fetch within one cycle
    pub retry_count: u32,

    /// Delay between fetch attempts in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            feed_url: "http://localhost:3000/api/banner-ads".to_string(),
            interval_ms: DEFAULT_INTERVAL_MS,
            fade_delay_ms: DEFAULT_FADE_DELAY_MS,
            fade_opacity: DEFAULT_FADE_OPACITY,
            request_timeout_ms: 10_000,
            retry_count: 0,
            retry_delay_ms: 500,
        }
    }
}

impl RotationConfig {
    /// Create a config for the given feed URL
    pub fn new(feed_url: impl Into<String>) -> Self {
        Self {
            feed_url: feed_url.into(),
            ..Default::default()
        }
    }

    /// Set the rotation interval
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval_ms = interval.as_millis() as u64;
        self
    }

    /// Set the fade delay
    #[must_use]
    pub fn with_fade_delay(mut self, delay: Duration) -> Self {
        self.fade_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the faded-out opacity
    #[must_use]
    pub fn with_fade_opacity(mut self, opacity: f32) -> Self {
        self.fade_opacity = opacity;
        self
    }

    /// Set request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set retry count
    #[must_use]
    pub fn with_retry_count(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> RotationResult<()> {
        if url::Url::parse(&self.feed_url).is_err() {
            return Err(RotationError::invalid_config(
                "feed_url",
                format!("Invalid URL: {}", self.feed_url),
            ));
        }

        if self.interval_ms == 0 {
            return Err(RotationError::InvalidInterval(
                "interval_ms must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.fade_opacity) {
            return Err(RotationError::invalid_config(
                "fade_opacity",
                "Must be between 0.0 and 1.0",
            ));
        }

        if self.request_timeout_ms == 0 {
            return Err(RotationError::invalid_config(
                "request_timeout_ms",
                "Must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Interval as Duration
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Fade delay as Duration
    pub fn fade_delay(&self) -> Duration {
        Duration::from_millis(self.fade_delay_ms)
    }

    /// Request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Retry delay as Duration
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
