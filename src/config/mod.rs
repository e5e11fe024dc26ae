use std::env;

use crate::error::{AppError, GatewayError, GatewayResult};

/// Environment variable holding the upstream bearer credential
pub const API_KEY_VAR: &str = "AI_GATEWAY_API_KEY";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub upstream: UpstreamConfig,
    pub request: RequestConfig,
    pub server: ServerConfig,
    pub webhooks: WebhookConfig,
    pub logging: LoggingConfig,
}

/// Upstream chat-completion provider configuration.
///
/// The API key is optional at load time so the service can start and report a
/// configuration error per request instead of refusing to boot.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub models: ModelConfig,
}

/// Model identifier per gateway family
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub instructor: String,
    pub officer: String,
    pub facility: String,
}

/// Completion request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Optional upper bound on a single upstream call; `None` waits indefinitely.
    pub timeout_ms: Option<u64>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
}

/// Best-effort webhook sinks; any of them may be left unset
#[derive(Debug, Clone, Default)]
pub struct WebhookConfig {
    pub activity_log_url: Option<String>,
    pub risk_alert_url: Option<String>,
    pub compliance_log_url: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let upstream = UpstreamConfig {
            api_key: non_empty_var(API_KEY_VAR),
            base_url: env::var("AI_GATEWAY_BASE_URL")
                .unwrap_or_else(|_| "https://ai.gateway.lovable.dev".to_string()),
            models: ModelConfig {
                instructor: env::var("INSTRUCTOR_MODEL")
                    .unwrap_or_else(|_| "google/gemini-2.5-flash".to_string()),
                officer: env::var("OFFICER_MODEL")
                    .unwrap_or_else(|_| "google/gemini-3-flash-preview".to_string()),
                facility: env::var("FACILITY_MODEL")
                    .unwrap_or_else(|_| "google/gemini-2.5-flash".to_string()),
            },
        };

        let request = RequestConfig {
            timeout_ms: match env::var("AI_GATEWAY_TIMEOUT_MS") {
                Ok(raw) => Some(raw.parse().map_err(|_| AppError::Config {
                    message: format!("AI_GATEWAY_TIMEOUT_MS must be an integer, got '{}'", raw),
                })?),
                Err(_) => None,
            },
            ..RequestConfig::default()
        };

        let server = ServerConfig {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        };

        let webhooks = WebhookConfig {
            activity_log_url: non_empty_var("ACTIVITY_LOG_WEBHOOK_URL"),
            risk_alert_url: non_empty_var("RISK_ALERT_WEBHOOK_URL"),
            compliance_log_url: non_empty_var("COMPLIANCE_LOG_WEBHOOK_URL"),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        Ok(Config {
            upstream,
            request,
            server,
            webhooks,
            logging,
        })
    }
}

impl UpstreamConfig {
    /// The bearer credential, or a configuration error when it is missing
    pub fn require_api_key(&self) -> GatewayResult<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GatewayError::Configuration {
                key: API_KEY_VAR.to_string(),
            })
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            instructor: "google/gemini-2.5-flash".to_string(),
            officer: "google/gemini-3-flash-preview".to_string(),
            facility: "google/gemini-2.5-flash".to_string(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
