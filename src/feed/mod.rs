//! Banner feed server
//!
//! Exposes the random ad selection over HTTP together with the landing page
//! that hosts the banner container.
//!
//! # Routes
//!
//! ```text
//! GET /                 landing page with the #dynamic-banners container
//! GET /api/banner-ads   JSON array of up to 3 ads, freshly sampled
//! GET /api/health       status, version, uptime
//! GET /robots.txt       crawler rules
//! GET /sitemap.xml      sitemap with today's lastmod
//! GET /metrics          Prometheus exposition
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use bannerwheel::feed::{FeedServer, FeedServerConfig};
//!
//! let server = FeedServer::new(FeedServerConfig::default())?;
//! server.start().await?;
//! ```

pub mod api;
pub mod config;
pub mod page;
pub mod server;

pub use api::BANNER_ADS_PATH;
pub use config::{ConfigError, FeedServerConfig, FeedServerConfigBuilder};
pub use page::{PageRenderer, BANNER_CONTAINER_ID};
pub use server::{AppState, FeedServer, ServerError, ServerInfo};
