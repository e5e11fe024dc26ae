//! HTTP surface.
//!
//! This module provides:
//! - Shared application state
//! - The axum router with CORS and request tracing
//! - Endpoint handlers for the three analysis families

mod handlers;

pub use handlers::*;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::events::{EventSink, NoopSink, WebhookSink};
use crate::gateway::AnalysisGateway;
use crate::llm::ChatClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Analysis gateway.
    pub gateway: AnalysisGateway,
}

impl AppState {
    /// Create state over an existing gateway
    pub fn new(config: Config, gateway: AnalysisGateway) -> Self {
        Self { config, gateway }
    }

    /// Build the chat client and event sink described by the configuration
    pub fn from_config(config: Config) -> AppResult<Self> {
        let client = ChatClient::new(&config.upstream, config.request.clone())?;

        let webhooks = WebhookSink::new(config.webhooks.clone()).map_err(|e| AppError::Config {
            message: e.to_string(),
        })?;
        let sink: Arc<dyn EventSink> = if webhooks.is_configured() {
            tracing::info!("Webhook event delivery enabled");
            Arc::new(webhooks)
        } else {
            tracing::info!("No webhooks configured, events are discarded");
            Arc::new(NoopSink)
        };

        if config.upstream.require_api_key().is_err() {
            tracing::warn!("AI gateway API key not set, analysis requests will fail");
        }

        let gateway = AnalysisGateway::new(client, sink);
        Ok(Self::new(config, gateway))
    }
}

/// Shared application state handle
pub type SharedState = Arc<AppState>;

/// Build the router for all endpoints.
///
/// `OPTIONS` on any path is answered by the CORS layer with an empty body.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ]);

    Router::new()
        .route("/health", get(health))
        .route("/vvfi-instructor", post(vvfi_instructor))
        .route("/vvfo-officer", post(vvfo_officer))
        .route("/analyze-facility", post(analyze_facility))
        .route("/compliance-log", post(compliance_log))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serve the router on a bound listener until the process stops
pub async fn serve(listener: TcpListener, state: SharedState) -> std::io::Result<()> {
    axum::serve(listener, build_router(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        LogFormat, LoggingConfig, ModelConfig, RequestConfig, ServerConfig, UpstreamConfig,
        WebhookConfig,
    };

    fn test_config(api_key: Option<&str>) -> Config {
        Config {
            upstream: UpstreamConfig {
                api_key: api_key.map(str::to_string),
                base_url: "http://127.0.0.1:9".to_string(),
                models: ModelConfig::default(),
            },
            request: RequestConfig::default(),
            server: ServerConfig {
                bind_addr: "127.0.0.1:0".to_string(),
            },
            webhooks: WebhookConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
            },
        }
    }

    #[tokio::test]
    async fn test_app_state_from_config() {
        let state = AppState::from_config(test_config(Some("test-key"))).unwrap();
        assert_eq!(state.config.upstream.api_key.as_deref(), Some("test-key"));
    }

    #[tokio::test]
    async fn test_app_state_starts_without_key() {
        let state = AppState::from_config(test_config(None)).unwrap();
        assert!(state.config.upstream.require_api_key().is_err());
    }

    #[tokio::test]
    async fn test_shared_state_clone() {
        let shared: SharedState = Arc::new(AppState::from_config(test_config(None)).unwrap());
        let other = Arc::clone(&shared);
        assert_eq!(Arc::strong_count(&shared), 2);
        drop(other);
        assert_eq!(Arc::strong_count(&shared), 1);
    }
}
