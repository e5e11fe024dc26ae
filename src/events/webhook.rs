use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::{EventSink, GatewayEvent};
use crate::config::WebhookConfig;
use crate::error::{SinkError, SinkResult};

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts each event as JSON to the webhook configured for its kind.
///
/// Kinds with no configured URL are skipped silently. Response bodies are
/// never read.
#[derive(Clone)]
pub struct WebhookSink {
    client: Client,
    config: WebhookConfig,
}

impl WebhookSink {
    /// Create a sink over the configured webhook URLs
    pub fn new(config: WebhookConfig) -> SinkResult<Self> {
        let client = Client::builder().timeout(DELIVERY_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    /// Whether any destination is configured at all
    pub fn is_configured(&self) -> bool {
        self.config.activity_log_url.is_some()
            || self.config.risk_alert_url.is_some()
            || self.config.compliance_log_url.is_some()
    }

    fn destination(&self, event: &GatewayEvent) -> Option<&str> {
        match event {
            GatewayEvent::Activity(_) => self.config.activity_log_url.as_deref(),
            GatewayEvent::RiskAlert(_) => self.config.risk_alert_url.as_deref(),
            GatewayEvent::ComplianceLog(_) => self.config.compliance_log_url.as_deref(),
        }
    }
}

#[async_trait]
impl EventSink for WebhookSink {
    async fn publish(&self, event: &GatewayEvent) -> SinkResult<()> {
        let Some(url) = self.destination(event) else {
            return Ok(());
        };

        let response = self.client.post(url).json(event).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!(event = event.kind(), status = status.as_u16(), "Event delivered");
        Ok(())
    }
}
