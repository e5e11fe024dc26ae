use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::modes::severity::{
    keyword_severity, report_severity, scan_safeguarding, structured_confidence, structured_severity,
    DEFAULT_STRUCTURED_CONFIDENCE,
};
use crate::modes::{extract_structured, AnalysisMode, Inference, ModeProfile, Severity};

/// Reply text plus everything derived from it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Raw reply text, unmodified.
    pub analysis: String,
    /// Recovered JSON object; `null` for text modes and failed extraction.
    pub structured: Option<Value>,
    pub critical: bool,
    pub requires_escalation: bool,
    pub severity: Severity,
    pub confidence: f64,
}

impl AnalysisResult {
    /// Derive metadata from a raw reply according to the mode's profile
    pub fn interpret(profile: &ModeProfile, reply: String) -> Self {
        match profile.inference {
            Inference::KeywordSeverity => Self {
                severity: keyword_severity(&reply),
                confidence: profile.default_confidence,
                critical: false,
                requires_escalation: false,
                structured: None,
                analysis: reply,
            },
            Inference::ReportSection => Self {
                severity: report_severity(&reply),
                confidence: profile.default_confidence,
                critical: false,
                requires_escalation: false,
                structured: None,
                analysis: reply,
            },
            Inference::Safeguarding => {
                let flags = scan_safeguarding(&reply);
                Self {
                    severity: flags.severity(),
                    confidence: profile.default_confidence,
                    critical: flags.critical,
                    requires_escalation: flags.requires_escalation,
                    structured: None,
                    analysis: reply,
                }
            }
            Inference::StructuredFields => {
                let structured = recover(profile.mode, &reply);
                let severity = structured
                    .as_ref()
                    .and_then(structured_severity)
                    .unwrap_or_default();
                let confidence = structured
                    .as_ref()
                    .and_then(structured_confidence)
                    .unwrap_or(DEFAULT_STRUCTURED_CONFIDENCE);
                Self {
                    analysis: reply,
                    structured,
                    critical: false,
                    requires_escalation: false,
                    severity,
                    confidence,
                }
            }
        }
    }
}

fn recover(mode: AnalysisMode, reply: &str) -> Option<Value> {
    match extract_structured(reply) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(mode = %mode, error = %e, "Structured reply not recovered, returning text only");
            None
        }
    }
}
