//! API server setup and configuration.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::routes;
use crate::database::repositories::{LibraryRepository, PinnedChannelRepository};
use crate::error::{Error, Result};
use crate::extractor::MediaExtractor;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server bind address
    pub bind_address: String,
    /// Server port
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Request body size limit in bytes
    pub body_limit: usize,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 4000,
            enable_cors: true,
            body_limit: 1024 * 1024, // 1MB; save requests carry metadata only
        }
    }
}

impl ApiServerConfig {
    /// Load API server config from environment variables, falling back to defaults.
    ///
    /// Supported env vars:
    /// - `API_BIND_ADDRESS` (e.g. "0.0.0.0")
    /// - `API_PORT` (e.g. "4000")
    pub fn from_env_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(bind_address) = std::env::var("API_BIND_ADDRESS")
            && !bind_address.trim().is_empty()
        {
            config.bind_address = bind_address;
        }

        if let Ok(port) = std::env::var("API_PORT")
            && let Ok(parsed) = port.parse::<u16>()
        {
            config.port = parsed;
        }

        config
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server start time for uptime calculation
    pub start_time: Instant,
    /// Media extractor backing search, channel listings and resolution
    pub extractor: Option<Arc<dyn MediaExtractor>>,
    /// Offline library repository
    pub library_repository: Option<Arc<dyn LibraryRepository>>,
    /// Pinned channel repository
    pub pinned_repository: Option<Arc<dyn PinnedChannelRepository>>,
    /// Shared HTTP client for the stream relay and library saves
    pub http_client: Option<reqwest::Client>,
}

impl AppState {
    /// Streaming-friendly client: connect timeout only, no overall request
    /// timeout, so long-lived media responses are not cut off mid-stream.
    pub(crate) fn build_http_client() -> reqwest::Client {
        match reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .tcp_nodelay(true)
            .build()
        {
            Ok(client) => client,
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    "Failed to build configured HTTP client; falling back to reqwest defaults"
                );
                reqwest::Client::new()
            }
        }
    }

    /// Create a new application state without services (for testing).
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            extractor: None,
            library_repository: None,
            pinned_repository: None,
            http_client: Some(Self::build_http_client()),
        }
    }

    /// Create application state with all services.
    pub fn with_services(
        extractor: Arc<dyn MediaExtractor>,
        library_repository: Arc<dyn LibraryRepository>,
        pinned_repository: Arc<dyn PinnedChannelRepository>,
    ) -> Self {
        Self {
            start_time: Instant::now(),
            extractor: Some(extractor),
            library_repository: Some(library_repository),
            pinned_repository: Some(pinned_repository),
            http_client: Some(Self::build_http_client()),
        }
    }

    /// Set the media extractor.
    pub fn with_extractor(mut self, extractor: Arc<dyn MediaExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Set the library repository.
    pub fn with_library_repository(mut self, repo: Arc<dyn LibraryRepository>) -> Self {
        self.library_repository = Some(repo);
        self
    }

    /// Set the pinned channel repository.
    pub fn with_pinned_repository(mut self, repo: Arc<dyn PinnedChannelRepository>) -> Self {
        self.pinned_repository = Some(repo);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// API server.
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
    cancel_token: CancellationToken,
}

impl ApiServer {
    /// Create a new API server.
    pub fn new(config: ApiServerConfig) -> Self {
        Self {
            config,
            state: AppState::new(),
            cancel_token: CancellationToken::new(),
        }
    }

    /// Create with custom state.
    pub fn with_state(config: ApiServerConfig, state: AppState) -> Self {
        Self {
            config,
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Get the cancellation token for graceful shutdown.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Build the router with all middleware and routes.
    fn build_router(&self) -> Router {
        let mut router = routes::create_router(self.state.clone())
            .layer(axum::extract::DefaultBodyLimit::max(self.config.body_limit));

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        router.layer(TraceLayer::new_for_http())
    }

    /// Start the server.
    pub async fn run(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.bind_address, self.config.port)
            .parse()
            .map_err(|e| Error::Configuration(format!("Invalid address: {}", e)))?;

        let router = self.build_router();
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("API server listening on http://{}", addr);

        let cancel_token = self.cancel_token.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                tracing::info!("API server shutting down...");
            })
            .await
            .map_err(Error::Io)?;

        Ok(())
    }

    /// Shutdown the server.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ApiServerConfig::default();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 4000);
        assert!(config.enable_cors);
    }

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.start_time.elapsed().as_secs() < 1);
        assert!(state.extractor.is_none());
        assert!(state.http_client.is_some());
    }

    #[test]
    fn test_server_creation() {
        let config = ApiServerConfig::default();
        let server = ApiServer::new(config);

        let token = server.cancel_token();
        assert!(!token.is_cancelled());
    }
}
