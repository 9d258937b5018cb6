//! Prometheus metrics for the banner feed and rotation loop
//!
//! This module provides metrics tracking for:
//! - Feed server: requests served, ads served per title
//! - Rotation client: cycle outcomes, banner clicks
//!
//! # Usage
//!
//! Call `init_metrics()` at application startup to register all metrics.
//! If initialization fails, metrics operations become no-ops.

use prometheus::{
    register_counter, register_counter_vec, Counter, CounterVec, Encoder, TextEncoder,
};
use std::sync::OnceLock;

// ============================================================================
// Metrics Storage
// ============================================================================

/// Container for feed server metrics
struct FeedMetrics {
    feed_requests: Counter,
    ads_served: CounterVec,
}

/// Container for rotation client metrics
struct RotationMetrics {
    cycles: CounterVec,
    banner_clicks: CounterVec,
}

static FEED_METRICS: OnceLock<FeedMetrics> = OnceLock::new();

static ROTATION_METRICS: OnceLock<RotationMetrics> = OnceLock::new();

/// Outcome of the first initialization attempt
static METRICS_INIT: OnceLock<Result<(), String>> = OnceLock::new();

// ============================================================================
// Initialization
// ============================================================================

/// Initialize all Prometheus metrics
///
/// Safe to call more than once; only the first call registers anything.
///
/// ```ignore
/// if let Err(e) = bannerwheel::metrics::init_metrics() {
///     tracing::warn!("Metrics initialization failed: {e}");
/// }
/// ```
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    METRICS_INIT
        .get_or_init(|| register_metrics().map_err(|e| e.to_string()))
        .clone()
        .map_err(Into::into)
}

fn register_metrics() -> Result<(), Box<dyn std::error::Error>> {
    let feed = FeedMetrics {
        feed_requests: register_counter!(
            "bannerwheel_feed_requests_total",
            "Total banner feed requests served"
        )?,
        ads_served: register_counter_vec!(
            "bannerwheel_ads_served_total",
            "Total times each ad was included in a feed response",
            &["title"]
        )?,
    };

    let rotation = RotationMetrics {
        cycles: register_counter_vec!(
            "bannerwheel_rotation_cycles_total",
            "Rotation cycles by outcome",
            &["outcome"]
        )?,
        banner_clicks: register_counter_vec!(
            "bannerwheel_banner_clicks_total",
            "Banner action button activations by ad title",
            &["title"]
        )?,
    };

    FEED_METRICS
        .set(feed)
        .map_err(|_| "Feed metrics already initialized")?;
    ROTATION_METRICS
        .set(rotation)
        .map_err(|_| "Rotation metrics already initialized")?;

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

/// Check if metrics have been initialized
pub fn metrics_initialized() -> bool {
    FEED_METRICS.get().is_some() && ROTATION_METRICS.get().is_some()
}

/// Encode all registered metrics in the Prometheus text format
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}

// ============================================================================
// Recording
// ============================================================================

/// Record one feed response and the ads it carried
pub fn record_feed_response<'a>(titles: impl IntoIterator<Item = &'a str>) {
    if let Some(m) = FEED_METRICS.get() {
        m.feed_requests.inc();
        for title in titles {
            m.ads_served.with_label_values(&[title]).inc();
        }
    }
}

/// Record a finished rotation cycle
pub fn record_rotation_cycle(outcome: &str) {
    if let Some(m) = ROTATION_METRICS.get() {
        m.cycles.with_label_values(&[outcome]).inc();
    }
}

/// Record a banner button activation
pub fn record_banner_click(title: &str) {
    if let Some(m) = ROTATION_METRICS.get() {
        m.banner_clicks.with_label_values(&[title]).inc();
    }
}
