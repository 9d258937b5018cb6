//! Feed client used by the rotation loop
//!
//! Fetches the current selection from the banner feed and classifies
//! failures. It never decides what to do about a failure; the transition
//! coordinator keeps the last render when a fetch fails.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::models::Selection;

use super::config::RotationConfig;
use super::error::FeedError;

/// Anything that can supply the next banner selection
#[async_trait]
pub trait SelectionSource: Send + Sync {
    /// Fetch the selection for one rotation cycle
    async fn fetch_selection(&self) -> Result<Selection, FeedError>;
}

/// HTTP client for the banner feed
#[derive(Debug, Clone)]
pub struct FeedClient {
    feed_url: String,
    http_client: Client,
    retry_count: u32,
    retry_delay: Duration,
}

impl FeedClient {
    /// Create a client from rotation configuration
    pub fn new(config: &RotationConfig) -> Result<Self, FeedError> {
        config
            .validate()
            .map_err(|e| FeedError::Init(e.to_string()))?;

        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| FeedError::Init(e.to_string()))?;

        Ok(Self {
            feed_url: config.feed_url.clone(),
            http_client,
            retry_count: config.retry_count,
            retry_delay: config.retry_delay(),
        })
    }

    /// URL this client polls
    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    async fn fetch_once(&self) -> Result<Selection, FeedError> {
        let response = self
            .http_client
            .get(&self.feed_url)
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        serde_json::from_slice::<Selection>(&body).map_err(|e| FeedError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SelectionSource for FeedClient {
    async fn fetch_selection(&self) -> Result<Selection, FeedError> {
        let mut attempt = 0;

        loop {
            match self.fetch_once().await {
                Ok(selection) => return Ok(selection),
                // A malformed body will not fix itself on retry
                Err(e) if !e.is_network() || attempt >= self.retry_count => return Err(e),
                Err(e) => {
                    attempt += 1;
                    tracing::debug!(
                        attempt,
                        error = %e,
                        delay_ms = self.retry_delay.as_millis() as u64,
                        "Retrying banner fetch"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }
}
