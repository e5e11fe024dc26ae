use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::config::{RequestConfig, UpstreamConfig};
use crate::error::{GatewayError, GatewayResult};

/// Client for an OpenAI-compatible chat-completion gateway
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    upstream: UpstreamConfig,
    request_config: RequestConfig,
}

impl ChatClient {
    /// Create a new chat client.
    ///
    /// A missing API key is not an error here; it is reported by
    /// [`ChatClient::api_key`] on every request.
    pub fn new(config: &UpstreamConfig, request_config: RequestConfig) -> GatewayResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout_ms) = request_config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder.build().map_err(GatewayError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            upstream: config.clone(),
            request_config,
        })
    }

    /// The configured bearer credential
    pub fn api_key(&self) -> GatewayResult<&str> {
        self.upstream.require_api_key()
    }

    /// Upstream provider configuration, including model identifiers
    pub fn upstream(&self) -> &UpstreamConfig {
        &self.upstream
    }

    /// Sampling parameters applied to every completion
    pub fn request_config(&self) -> &RequestConfig {
        &self.request_config
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run one chat completion and return the text of the first choice.
    ///
    /// Never retries: rate-limit and quota responses come back as their own
    /// error kinds so the caller can choose a policy.
    pub async fn complete(&self, request: &ChatCompletionRequest) -> GatewayResult<String> {
        let api_key = self.api_key()?;
        let url = format!("{}/v1/chat/completions", self.base_url);
        let start = Instant::now();

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Calling chat completion"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Upstream {
                        status: None,
                        message: format!(
                            "Request timeout after {}ms",
                            self.request_config.timeout_ms.unwrap_or_default()
                        ),
                    }
                } else {
                    GatewayError::Http(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(
                model = %request.model,
                status = status.as_u16(),
                body = %error_body,
                latency_ms = start.elapsed().as_millis(),
                "Chat completion failed"
            );
            return Err(map_status(status, error_body));
        }

        let completion: ChatCompletionResponse =
            response
                .json()
                .await
                .map_err(|e| GatewayError::Upstream {
                    status: None,
                    message: format!("Failed to parse response: {}", e),
                })?;

        let content = completion
            .first_content()
            .ok_or_else(|| GatewayError::Upstream {
                status: None,
                message: "Response contained no choices".to_string(),
            })?
            .to_string();

        info!(
            model = %request.model,
            latency_ms = start.elapsed().as_millis(),
            total_tokens = ?completion.usage.as_ref().and_then(|u| u.total_tokens),
            "Chat completion succeeded"
        );

        Ok(content)
    }
}

fn map_status(status: StatusCode, body: String) -> GatewayError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited,
        StatusCode::PAYMENT_REQUIRED => GatewayError::QuotaExhausted,
        other => GatewayError::Upstream {
            status: Some(other.as_u16()),
            message: body,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;

    fn upstream(api_key: Option<&str>) -> UpstreamConfig {
        UpstreamConfig {
            api_key: api_key.map(str::to_string),
            base_url: "https://ai.gateway.example/".to_string(),
            models: ModelConfig::default(),
        }
    }

    #[test]
    fn test_client_creation() {
        let client = ChatClient::new(&upstream(Some("test_key")), RequestConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = ChatClient::new(&upstream(Some("k")), RequestConfig::default()).unwrap();
        assert_eq!(client.base_url(), "https://ai.gateway.example");
    }

    #[test]
    fn test_client_without_key_builds_but_reports_missing_key() {
        let client = ChatClient::new(&upstream(None), RequestConfig::default()).unwrap();
        assert!(matches!(
            client.api_key(),
            Err(GatewayError::Configuration { .. })
        ));
    }

    #[test]
    fn test_map_status() {
        assert!(matches!(
            map_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            GatewayError::RateLimited
        ));
        assert!(matches!(
            map_status(StatusCode::PAYMENT_REQUIRED, String::new()),
            GatewayError::QuotaExhausted
        ));
        match map_status(StatusCode::BAD_GATEWAY, "upstream down".to_string()) {
            GatewayError::Upstream { status, message } => {
                assert_eq!(status, Some(502));
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
