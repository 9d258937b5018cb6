//! bannerwheel - Rotating promotional banners
//!
//! Serves a random selection of promotional ads over HTTP and drives a
//! timed fade/fetch/render rotation loop that consumes it.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`] - The ad record and selection type
//! - [`pool`] - Fixed ad pool and catalog loading
//! - [`selection`] - Uniform random sampling without replacement
//! - [`feed`] - HTTP feed server (axum)
//! - [`rotation`] - Scheduler, feed client, renderer and transition state machine
//! - [`config`] - Configuration management and settings
//! - [`metrics`] - Prometheus counters
//! - [`error`] - Unified error type
//!
//! # Example
//!
//! ```no_run
//! use bannerwheel::config::Config;
//! use bannerwheel::feed::FeedServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = FeedServer::new(config.server)?;
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod metrics;
pub mod models;
pub mod pool;
pub mod rotation;
pub mod selection;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{BannerErrorTrait, Error, ErrorCategory, Result};
    pub use crate::feed::{FeedServer, FeedServerConfig};
    pub use crate::models::{Ad, Selection};
    pub use crate::pool::AdPool;
    pub use crate::rotation::{
        BannerContainer, BannerRenderer, BannerSurface, FeedClient, RotationConfig,
        RotationScheduler, SelectionSource, TransitionCoordinator,
    };
    pub use crate::selection::SelectionService;
}

// Direct re-exports for convenience
pub use models::{Ad, Selection};
