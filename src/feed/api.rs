//! HTTP handlers for the feed server
//!
//! This module defines the routes and handlers for the banner feed and the
//! supporting static endpoints.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::metrics;
use crate::models::Selection;

use super::page::{robots_txt, sitemap_xml};
use super::server::AppState;

/// Path of the banner feed
pub const BANNER_ADS_PATH: &str = "/api/banner-ads";

// ============================================================================
// API Response Types
// ============================================================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub pool_size: usize,
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/robots.txt", get(robots))
        .route("/sitemap.xml", get(sitemap))
        .route(BANNER_ADS_PATH, get(banner_ads))
        .route("/api/health", get(health_check))
        .route("/metrics", get(prometheus_metrics))
        .with_state(state)
}

// ============================================================================
// Feed Handlers
// ============================================================================

/// Random selection of ads; never fails, an empty pool yields `[]`
async fn banner_ads(State(state): State<AppState>) -> Json<Selection> {
    let selection = state.selection.next_selection();

    metrics::record_feed_response(selection.iter().map(|ad| ad.title.as_str()));
    tracing::debug!(count = selection.len(), "Serving banner selection");

    Json(selection)
}

// ============================================================================
// Page Handlers
// ============================================================================

async fn index_page(State(state): State<AppState>) -> axum::response::Response {
    let pool = state.selection.pool().as_slice();
    let initial = &pool[..state.selection.size().min(pool.len())];

    match state.pages.render_index(initial) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render index page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(state.config.base_url()),
    )
}

async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let today = chrono::Utc::now().date_naive();
    (
        [(header::CONTENT_TYPE, "application/xml")],
        sitemap_xml(state.config.base_url(), today),
    )
}

// ============================================================================
// Operational Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        pool_size: state.selection.pool().len(),
    })
}

async fn prometheus_metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::encode_metrics(),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedServer, FeedServerConfig};
    use crate::models::Ad;
    use crate::pool::AdPool;

    fn state_with(pool: AdPool) -> AppState {
        let config = FeedServerConfig::builder().seed(11).build().unwrap();
        FeedServer::with_pool(config, pool).unwrap().state()
    }

    #[tokio::test]
    async fn test_banner_ads_returns_three() {
        let state = state_with(AdPool::builtin());
        let Json(selection) = banner_ads(State(state)).await;
        assert_eq!(selection.len(), 3);
    }

    #[tokio::test]
    async fn test_banner_ads_on_empty_pool() {
        let state = state_with(AdPool::default());
        let Json(selection) = banner_ads(State(state)).await;
        assert!(selection.is_empty());
    }

    #[tokio::test]
    async fn test_banner_ads_small_pool() {
        let pool = AdPool::new(vec![Ad::new("Only", "s", "d", "b", "#000")]);
        let Json(selection) = banner_ads(State(state_with(pool))).await;
        assert_eq!(selection.len(), 1);
        assert_eq!(selection[0].title, "Only");
    }

    #[tokio::test]
    async fn test_health_check() {
        let state = state_with(AdPool::builtin());
        let Json(health) = health_check(State(state)).await;

        assert_eq!(health.status, "healthy");
        assert_eq!(health.pool_size, 4);
    }
}
