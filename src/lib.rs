//! # Facility Analysis Gateway
//!
//! An HTTP service that turns facility photos, free-text questions and
//! structured operational forms into analysis reports produced by an
//! OpenAI-compatible chat-completion gateway.
//!
//! ## Features
//!
//! - **Instructor** (`/vvfi-instructor`): photo inspection, technical Q&A with
//!   conversation history, ethical guidance with safeguarding flags
//! - **Officer** (`/vvfo-officer`): operational and asset/vendor analysis with
//!   JSON replies, photo evidence, compliance guidance
//! - **Facility** (`/analyze-facility`): telemetry reports in a fixed layout
//! - **Structured recovery**: the JSON object embedded in a prose reply is
//!   found and parsed; failure degrades to text only
//! - **Events**: activity records, risk alerts and compliance logs posted to
//!   optional webhooks without affecting responses
//!
//! ## Architecture
//!
//! ```text
//! Browser → axum router → AnalysisGateway → chat completion (HTTP)
//!                               ↓
//!                         EventSink (webhooks)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use facility_analysis_gateway::{Config, AppState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
//!     let state = Arc::new(AppState::from_config(config)?);
//!     facility_analysis_gateway::server::serve(listener, state).await?;
//!     Ok(())
//! }
//! ```

/// Configuration loaded from the environment.
pub mod config;
/// Error types and result aliases.
pub mod error;
/// Events emitted after analyses and their delivery sinks.
pub mod events;
/// Analysis orchestration and reply interpretation.
pub mod gateway;
/// Chat-completion client and wire types.
pub mod llm;
/// Analysis modes, request payloads, extraction and severity inference.
pub mod modes;
/// System prompt text for every mode.
pub mod prompts;
/// HTTP router and handlers.
pub mod server;

pub use config::Config;
pub use error::{AppError, AppResult, GatewayError, GatewayResult};
pub use gateway::{AnalysisGateway, AnalysisResult};
pub use server::{build_router, AppState, SharedState};
