//! Analysis orchestration: one request in, one upstream call, one result out.

mod result;

pub use result::AnalysisResult;

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ModelConfig;
use crate::error::GatewayResult;
use crate::events::{EventPublisher, EventSink, GatewayEvent, Outcome};
use crate::llm::{ChatClient, ChatCompletionRequest};
use crate::modes::{profile, AnalysisRequest, GatewayFamily};

/// Runs analyses against the upstream model and reports them to the event sink
#[derive(Clone)]
pub struct AnalysisGateway {
    client: ChatClient,
    events: EventPublisher,
}

impl AnalysisGateway {
    /// Create a gateway over a chat client and an event sink
    pub fn new(client: ChatClient, sink: Arc<dyn EventSink>) -> Self {
        Self {
            client,
            events: EventPublisher::new(sink),
        }
    }

    /// Create a gateway that emits no events
    pub fn without_events(client: ChatClient) -> Self {
        Self {
            client,
            events: EventPublisher::noop(),
        }
    }

    /// Publisher used for events that do not come from an analysis
    pub fn events(&self) -> &EventPublisher {
        &self.events
    }

    /// Fail with a configuration error when no API key is set
    pub fn ensure_configured(&self) -> GatewayResult<()> {
        self.client.api_key().map(|_| ())
    }

    /// Run one analysis.
    ///
    /// A missing credential fails before any message is built or sent. Event
    /// delivery happens after the result is returned and cannot change it.
    pub async fn analyze(&self, request: AnalysisRequest) -> GatewayResult<AnalysisResult> {
        let start = Instant::now();
        let request_id = Uuid::new_v4();
        let mode = request.mode();

        self.ensure_configured()?;

        let messages = request.build_messages()?;
        let model = model_for(&self.client.upstream().models, mode.family());
        debug!(
            request_id = %request_id,
            mode = %mode,
            model = %model,
            messages = messages.len(),
            "Dispatching analysis"
        );

        let settings = self.client.request_config();
        let completion = ChatCompletionRequest::new(model, messages)
            .with_temperature(settings.temperature)
            .with_max_tokens(settings.max_tokens);

        let reply = match self.client.complete(&completion).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    request_id = %request_id,
                    mode = %mode,
                    status = e.status_code().as_u16(),
                    latency_ms = start.elapsed().as_millis(),
                    error = %e,
                    "Analysis failed"
                );
                return Err(e);
            }
        };

        let result = AnalysisResult::interpret(&profile(mode), reply);

        let outcome = Outcome {
            request_id,
            analysis: &result.analysis,
            structured: result.structured.as_ref(),
            severity: result.severity,
            confidence: result.confidence,
            critical: result.critical,
            requires_escalation: result.requires_escalation,
        };
        self.events
            .emit(GatewayEvent::for_analysis(&request, &outcome));

        info!(
            request_id = %request_id,
            mode = %mode,
            severity = %result.severity,
            critical = result.critical,
            structured = result.structured.is_some(),
            latency_ms = start.elapsed().as_millis(),
            "Analysis completed"
        );

        Ok(result)
    }
}

fn model_for(models: &ModelConfig, family: GatewayFamily) -> &str {
    match family {
        GatewayFamily::Instructor => &models.instructor,
        GatewayFamily::Officer => &models.officer,
        GatewayFamily::Facility => &models.facility,
    }
}
