//! Feed server implementation
//!
//! Owns the shared application state and runs the axum HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::pool::{AdPool, CatalogError};
use crate::selection::SelectionService;

use super::api::create_router;
use super::config::{ConfigError, FeedServerConfig};
use super::page::PageRenderer;

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Random sampler over the pool
    pub selection: Arc<SelectionService>,

    /// Compiled page templates
    pub pages: Arc<PageRenderer>,

    /// Server start time
    pub start_time: Instant,

    /// Configuration
    pub config: FeedServerConfig,
}

// ============================================================================
// Feed Server
// ============================================================================

/// HTTP server exposing the banner feed
pub struct FeedServer {
    config: FeedServerConfig,
    state: AppState,
}

impl FeedServer {
    /// Create a server, loading the pool from the configured catalog
    pub fn new(config: FeedServerConfig) -> Result<Self, ServerError> {
        let pool = match &config.catalog_path {
            Some(path) => AdPool::from_file(path)?,
            None => AdPool::builtin(),
        };

        Self::with_pool(config, pool)
    }

    /// Create a server around an explicit pool
    pub fn with_pool(config: FeedServerConfig, pool: AdPool) -> Result<Self, ServerError> {
        config.validate()?;

        let mut selection = SelectionService::new(pool).with_size(config.selection_size);
        if let Some(seed) = config.seed {
            selection = selection.with_seed(seed);
        }

        let pages = PageRenderer::new().map_err(|e| ServerError::Template(e.to_string()))?;

        let state = AppState {
            selection: Arc::new(selection),
            pages: Arc::new(pages),
            start_time: Instant::now(),
            config: config.clone(),
        };

        Ok(Self { config, state })
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes and layers
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Bind the configured address
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let addr = self.config.bind_address;
        TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })
    }

    /// Start the server and run until the process ends
    pub async fn start(&self) -> Result<(), ServerError> {
        self.start_with_shutdown(std::future::pending()).await
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_signal).await
    }

    /// Serve on an already bound listener
    pub async fn serve(
        &self,
        listener: TcpListener,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr().map_err(ServerError::Serve)?;
        tracing::info!(
            %addr,
            pool_size = self.state.selection.pool().len(),
            "Starting feed server"
        );

        axum::serve(listener, self.build_router())
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(ServerError::Serve)?;

        tracing::info!("Feed server shutdown complete");
        Ok(())
    }

    /// Get server info
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            bind_address: self.config.bind_address,
            pool_size: self.state.selection.pool().len(),
            selection_size: self.config.selection_size,
            seeded: self.config.seed.is_some(),
            cors_enabled: self.config.enable_cors,
            request_logging_enabled: self.config.enable_request_logging,
        }
    }
}

/// Server information
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub bind_address: SocketAddr,
    pub pool_size: usize,
    pub selection_size: usize,
    pub seeded: bool,
    pub cors_enabled: bool,
    pub request_logging_enabled: bool,
}

impl ServerInfo {
    /// Format as display string
    pub fn display(&self) -> String {
        format!(
            "Banner Feed Server\n\
             {:-<40}\n\
             Bind Address: {}\n\
             Pool Size: {}\n\
             Ads Per Response: {}\n\
             Seeded: {}\n\
             CORS: {}\n\
             Request Logging: {}",
            "",
            self.bind_address,
            self.pool_size,
            self.selection_size,
            if self.seeded { "yes" } else { "no" },
            if self.cors_enabled { "enabled" } else { "disabled" },
            if self.request_logging_enabled { "enabled" } else { "disabled" }
        )
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog could not be loaded
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Page templates failed to compile
    #[error("Template error: {0}")]
    Template(String),

    /// Failed to bind to address
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Server error
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_creation() {
        let server = FeedServer::new(FeedServerConfig::default());
        assert!(server.is_ok());
    }

    #[test]
    fn test_server_info() {
        let server = FeedServer::new(FeedServerConfig::default()).unwrap();
        let info = server.info();

        assert_eq!(info.pool_size, 4);
        assert_eq!(info.selection_size, 3);
        assert!(info.cors_enabled);
        assert!(info.display().contains("Pool Size: 4"));
    }

    #[test]
    fn test_server_with_custom_config() {
        let config = FeedServerConfig::builder()
            .selection_size(2)
            .seed(5)
            .enable_cors(false)
            .build()
            .unwrap();

        let server = FeedServer::new(config).unwrap();
        let info = server.info();

        assert_eq!(info.selection_size, 2);
        assert!(info.seeded);
        assert!(!info.cors_enabled);
    }

    #[test]
    fn test_missing_catalog_fails() {
        let config = FeedServerConfig::builder()
            .catalog_path("/nonexistent/ads.json")
            .build()
            .unwrap();

        let result = FeedServer::new(config);
        assert!(matches!(result, Err(ServerError::Catalog(_))));
    }
}
