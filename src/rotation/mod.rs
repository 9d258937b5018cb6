//! Banner rotation loop
//!
//! Polls the banner feed on a timer and re-renders the banner container with
//! a fade transition around every fetch.
//!
//! # Components
//!
//! - [`RotationScheduler`] fires a tick every interval, first tick immediate
//! - [`TransitionCoordinator`] runs one fade-out → fetch → render → fade-in
//!   cycle per tick and skips ticks while a cycle is in flight
//! - [`FeedClient`] fetches the selection over HTTP
//! - [`BannerRenderer`] rebuilds the container from a selection
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use bannerwheel::rotation::*;
//!
//! let config = RotationConfig::new("http://localhost:3000/api/banner-ads");
//! let client = Arc::new(FeedClient::new(&config)?);
//! let coordinator = Arc::new(
//!     TransitionCoordinator::new(BannerContainer::default(), client, BannerRenderer::default())
//!         .with_config(&config),
//! );
//! let scheduler = RotationScheduler::new(coordinator);
//! scheduler.start(config.interval()).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod render;
pub mod scheduler;
pub mod transition;

pub use client::{FeedClient, SelectionSource};
pub use config::RotationConfig;
pub use error::{FeedError, RotationError, RotationResult};
pub use render::{
    default_click_handler, ActionButton, BannerContainer, BannerNode, BannerRenderer,
    BannerSurface, ClickAction, ClickHandler,
};
pub use scheduler::RotationScheduler;
pub use transition::{
    CycleOutcome, RotationEvent, RotationState, RotationStats, TransitionCoordinator,
};
