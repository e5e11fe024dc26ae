use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Message surfaced to callers when the upstream provider throttles us.
pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again in a moment.";

/// Message surfaced to callers when the upstream account is out of credits.
pub const QUOTA_MESSAGE: &str = "AI credits depleted. Please add credits to your workspace.";

/// Application-level errors raised while starting the service
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced while serving a single analysis request
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{key} is not configured")]
    Configuration { key: String },

    #[error("{}", RATE_LIMIT_MESSAGE)]
    RateLimited,

    #[error("{}", QUOTA_MESSAGE)]
    QuotaExhausted,

    #[error("AI gateway error: {}", format_upstream(*status, message))]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid request: {field} - {reason}")]
    InvalidRequest { field: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

fn format_upstream(status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) if message.is_empty() => code.to_string(),
        Some(code) => format!("{} - {}", code, message),
        None => message.to_string(),
    }
}

impl GatewayError {
    /// HTTP status the error maps to at the service boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::QuotaExhausted => StatusCode::PAYMENT_REQUIRED,
            GatewayError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            GatewayError::Configuration { .. }
            | GatewayError::Upstream { .. }
            | GatewayError::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether a caller may retry the same request later without account action
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::RateLimited | GatewayError::Upstream { .. } | GatewayError::Http(_)
        )
    }

    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        GatewayError::InvalidRequest {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Reasons a reply carried no recoverable JSON object.
///
/// These never fail a request; the raw reply stays the only output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("No JSON object found in reply")]
    NoObject,

    #[error("Malformed structured response: {message}")]
    Malformed { message: String },
}

/// Webhook delivery errors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Webhook delivery failed: {0}")]
    Delivery(#[from] reqwest::Error),

    #[error("Webhook rejected event: {status}")]
    Rejected { status: u16 },
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Result type alias for webhook delivery
pub type SinkResult<T> = Result<T, SinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config {
            message: "bad bind address".to_string(),
        };
        assert_eq!(err.to_string(), "Configuration error: bad bind address");
    }

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::Configuration {
            key: "AI_GATEWAY_API_KEY".to_string(),
        };
        assert_eq!(err.to_string(), "AI_GATEWAY_API_KEY is not configured");

        assert_eq!(GatewayError::RateLimited.to_string(), RATE_LIMIT_MESSAGE);
        assert_eq!(GatewayError::QuotaExhausted.to_string(), QUOTA_MESSAGE);

        let err = GatewayError::Upstream {
            status: Some(503),
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "AI gateway error: 503 - unavailable");

        let err = GatewayError::Upstream {
            status: Some(500),
            message: String::new(),
        };
        assert_eq!(err.to_string(), "AI gateway error: 500");

        let err = GatewayError::Upstream {
            status: None,
            message: "reply had no choices".to_string(),
        };
        assert_eq!(err.to_string(), "AI gateway error: reply had no choices");

        let err = GatewayError::invalid("photos", "at least one photo is required");
        assert_eq!(
            err.to_string(),
            "Invalid request: photos - at least one photo is required"
        );
    }

    #[test]
    fn test_gateway_error_status_codes() {
        assert_eq!(
            GatewayError::RateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            GatewayError::QuotaExhausted.status_code(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            GatewayError::invalid("question", "empty").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::Configuration {
                key: "AI_GATEWAY_API_KEY".to_string()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::Upstream {
                status: Some(418),
                message: String::new()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_retryability() {
        assert!(GatewayError::RateLimited.is_retryable());
        assert!(!GatewayError::QuotaExhausted.is_retryable());
        assert!(!GatewayError::Configuration {
            key: "k".to_string()
        }
        .is_retryable());
        assert!(!GatewayError::invalid("photos", "none").is_retryable());
    }

    #[tokio::test]
    async fn test_gateway_error_into_response() {
        let response = GatewayError::RateLimited.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], RATE_LIMIT_MESSAGE);
    }

    #[test]
    fn test_extraction_error_display() {
        assert_eq!(
            ExtractionError::NoObject.to_string(),
            "No JSON object found in reply"
        );
        let err = ExtractionError::Malformed {
            message: "expected value at line 1 column 2".to_string(),
        };
        assert!(err.to_string().starts_with("Malformed structured response"));
    }

    #[test]
    fn test_sink_error_display() {
        let err = SinkError::Rejected { status: 404 };
        assert_eq!(err.to_string(), "Webhook rejected event: 404");
    }

    #[test]
    fn test_gateway_error_conversion_to_app_error() {
        let app_err: AppError = GatewayError::QuotaExhausted.into();
        assert!(matches!(app_err, AppError::Gateway(_)));
    }
}
