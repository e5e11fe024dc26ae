//! Output port for analysis side effects.
//!
//! The gateway describes what happened as a [`GatewayEvent`] and hands it to
//! an [`EventSink`] on a detached task. Whatever the sink does, including
//! failing, has no bearing on the response the caller receives.

mod webhook;

pub use webhook::WebhookSink;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::error::SinkResult;
use crate::modes::{AnalysisMode, AnalysisRequest, Severity};

/// Longest summary kept in activity records
const ACTIVITY_SUMMARY_CHARS: usize = 100;
/// Longest summary kept in risk alerts
const ALERT_SUMMARY_CHARS: usize = 200;
/// Longest content kept in compliance-log entries
const COMPLIANCE_CONTENT_CHARS: usize = 500;

/// Event emitted by the gateway
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GatewayEvent {
    /// Every successful analysis.
    Activity(ActivityRecord),
    /// A reply flagged critical or requiring escalation.
    RiskAlert(RiskAlert),
    /// A report forwarded to the compliance portal or flagged for review.
    ComplianceLog(ComplianceLogEntry),
}

/// Unified activity-log record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActivityRecord {
    pub request_id: Uuid,
    pub user: String,
    pub mode: String,
    pub timestamp: DateTime<Utc>,
    pub summary: String,
    pub recommendations: String,
    pub severity: String,
    pub confidence: f64,
}

/// Critical-risk alert
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RiskAlert {
    pub request_id: Uuid,
    #[serde(rename = "Type")]
    pub kind: String,
    pub category: String,
    pub timestamp: DateTime<Utc>,
    pub summary: String,
    pub severity: String,
}

/// Compliance portal entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComplianceLogEntry {
    #[serde(rename = "Type")]
    pub kind: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

/// What the gateway concluded about one request, as seen by event builders
#[derive(Debug, Clone, Copy)]
pub struct Outcome<'a> {
    pub request_id: Uuid,
    pub analysis: &'a str,
    pub structured: Option<&'a serde_json::Value>,
    pub severity: Severity,
    pub confidence: f64,
    pub critical: bool,
    pub requires_escalation: bool,
}

/// Truncate to at most `max` characters
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

impl GatewayEvent {
    /// Events describing one completed analysis: always an activity record,
    /// plus a risk alert when the reply was flagged.
    pub fn for_analysis(request: &AnalysisRequest, outcome: &Outcome<'_>) -> Vec<GatewayEvent> {
        let now = Utc::now();
        let mode = request.mode();
        let mut events = vec![GatewayEvent::Activity(ActivityRecord {
            request_id: outcome.request_id,
            user: "System".to_string(),
            mode: mode.display_label().to_string(),
            timestamp: now,
            summary: activity_summary(request, outcome),
            recommendations: recommendations(outcome),
            severity: activity_severity(outcome).to_string(),
            confidence: outcome.confidence,
        })];

        if outcome.critical || outcome.requires_escalation {
            events.push(GatewayEvent::RiskAlert(RiskAlert {
                request_id: outcome.request_id,
                kind: alert_kind(mode),
                category: request.category().unwrap_or("General").to_string(),
                timestamp: now,
                summary: truncate_chars(
                    request.question().unwrap_or(outcome.analysis),
                    ALERT_SUMMARY_CHARS,
                ),
                severity: if outcome.critical {
                    "CRITICAL".to_string()
                } else {
                    "ESCALATION_REQUIRED".to_string()
                },
            }));
        }

        events
    }

    /// Entry for a report sent to the compliance portal
    pub fn compliance_log(report_type: &str, content: &str) -> GatewayEvent {
        GatewayEvent::ComplianceLog(ComplianceLogEntry {
            kind: report_type.to_string(),
            content: truncate_chars(content, COMPLIANCE_CONTENT_CHARS),
            timestamp: Utc::now(),
            priority: None,
        })
    }

    /// Entry for a report flagged for leadership review
    pub fn review_flag(report_type: &str, content: &str) -> GatewayEvent {
        GatewayEvent::ComplianceLog(ComplianceLogEntry {
            kind: format!("VVFO_{}_REVIEW", report_type.to_uppercase().replace('-', "_")),
            content: truncate_chars(content, COMPLIANCE_CONTENT_CHARS),
            timestamp: Utc::now(),
            priority: Some("Leadership Review Required".to_string()),
        })
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayEvent::Activity(_) => "activity",
            GatewayEvent::RiskAlert(_) => "risk_alert",
            GatewayEvent::ComplianceLog(_) => "compliance_log",
        }
    }
}

fn alert_kind(mode: AnalysisMode) -> String {
    match mode {
        AnalysisMode::Ethical => "Critical_Ethical_Issue".to_string(),
        AnalysisMode::ComplianceGuidance => "Compliance_Ethics_Issue".to_string(),
        other => format!("{}_Issue", other.display_label().replace(['-', ' '], "_")),
    }
}

fn activity_summary(request: &AnalysisRequest, outcome: &Outcome<'_>) -> String {
    let from_structured = |key: &str| {
        outcome
            .structured
            .and_then(|s| s.get(key))
            .and_then(|v| v.as_str())
            .map(|s| truncate_chars(s, ACTIVITY_SUMMARY_CHARS))
    };

    match request {
        AnalysisRequest::Text(_)
        | AnalysisRequest::Ethical(_)
        | AnalysisRequest::ComplianceGuidance(_) => {
            truncate_chars(request.question().unwrap_or(""), ACTIVITY_SUMMARY_CHARS)
        }
        AnalysisRequest::Operational(_) => {
            from_structured("Issue").unwrap_or_else(|| "Operational Analysis".to_string())
        }
        AnalysisRequest::AssetVendor(data) => from_structured("Contract_Status")
            .or_else(|| data.asset_id.clone())
            .unwrap_or_else(|| "Asset/Vendor Analysis".to_string()),
        AnalysisRequest::OfficerPhoto(_) => from_structured("Observed_Condition")
            .unwrap_or_else(|| "Photo analysis completed".to_string()),
        AnalysisRequest::InstructorPhoto(_) => "Photo analysis completed".to_string(),
        AnalysisRequest::FacilityMetrics(_) => {
            format!("{} analysis completed", request.mode().display_label())
        }
    }
}

fn recommendations(outcome: &Outcome<'_>) -> String {
    let listed = outcome
        .structured
        .and_then(|s| s.get("Recommended_Actions").or_else(|| s.get("Recommendations")))
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        });
    listed.unwrap_or_else(|| outcome.analysis.to_string())
}

fn activity_severity(outcome: &Outcome<'_>) -> &'static str {
    if outcome.critical {
        "CRITICAL"
    } else if outcome.requires_escalation && outcome.severity < Severity::High {
        Severity::High.as_str()
    } else {
        outcome.severity.as_str()
    }
}

/// Destination for gateway events
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver one event. Errors are logged by the caller and dropped.
    async fn publish(&self, event: &GatewayEvent) -> SinkResult<()>;
}

/// Sink that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

#[async_trait]
impl EventSink for NoopSink {
    async fn publish(&self, _event: &GatewayEvent) -> SinkResult<()> {
        Ok(())
    }
}

/// Hands events to a sink without waiting for delivery
#[derive(Clone)]
pub struct EventPublisher {
    sink: Arc<dyn EventSink>,
}

impl EventPublisher {
    /// Create a publisher over a sink
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Publisher that drops everything
    pub fn noop() -> Self {
        Self::new(Arc::new(NoopSink))
    }

    /// Deliver events in order on a detached task
    pub fn emit(&self, events: Vec<GatewayEvent>) {
        if events.is_empty() {
            return;
        }
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            for event in events {
                if let Err(e) = sink.publish(&event).await {
                    warn!(event = event.kind(), error = %e, "Event delivery failed");
                }
            }
        });
    }
}
