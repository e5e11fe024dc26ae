use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::registry::profile;
use super::AnalysisMode;
use crate::error::{GatewayError, GatewayResult};
use crate::llm::{ContentPart, Message};
use crate::prompts::CONVERSATION_CONTEXT_NOTE;

/// Number of prior turns forwarded with a text question
pub const MAX_HISTORY_TURNS: usize = 5;

/// Placeholder used when a structured field was left empty
const NOT_SPECIFIED: &str = "Not specified";

/// Image media types the dashboard is expected to send
const SUPPORTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// Focus of a facility-metrics analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityFocus {
    Performance,
    Compliance,
    Training,
}

/// Facility telemetry: any JSON object of fields (equipment id, efficiency, notes...)
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityMetrics {
    pub focus: FacilityFocus,
    pub data: Map<String, Value>,
}

/// Operational form fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationalData {
    pub equipment_id: Option<String>,
    pub system_type: Option<String>,
    pub performance_metrics: Option<String>,
    pub asset_status: Option<String>,
    pub operator_notes: Option<String>,
    pub maintenance_logs: Option<String>,
    pub compliance_status: Option<String>,
}

/// Asset and vendor form fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetVendorData {
    pub asset_id: Option<String>,
    pub asset_type: Option<String>,
    pub vendor_name: Option<String>,
    pub contract_type: Option<String>,
    pub sla_terms: Option<String>,
    pub performance_notes: Option<String>,
    pub cost_data: Option<String>,
    pub issue_history: Option<String>,
}

/// Encoded images (data URIs) plus the count the caller declared
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoBatch {
    pub photos: Vec<String>,
    pub declared_count: Option<usize>,
}

/// One prior turn of a text conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub content: String,
}

/// Free-text question with prior turns, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextQuestion {
    pub question: String,
    pub history: Vec<ConversationTurn>,
}

/// Free-text concern with an optional category tag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Concern {
    pub question: String,
    pub category: Option<String>,
}

/// A typed analysis request; exactly one mode per request
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisRequest {
    FacilityMetrics(FacilityMetrics),
    Operational(OperationalData),
    AssetVendor(AssetVendorData),
    InstructorPhoto(PhotoBatch),
    OfficerPhoto(PhotoBatch),
    Text(TextQuestion),
    Ethical(Concern),
    ComplianceGuidance(Concern),
}

impl AnalysisRequest {
    /// The mode this request runs under
    pub fn mode(&self) -> AnalysisMode {
        match self {
            AnalysisRequest::FacilityMetrics(metrics) => match metrics.focus {
                FacilityFocus::Performance => AnalysisMode::FacilityPerformance,
                FacilityFocus::Compliance => AnalysisMode::FacilityCompliance,
                FacilityFocus::Training => AnalysisMode::FacilityTraining,
            },
            AnalysisRequest::Operational(_) => AnalysisMode::Operational,
            AnalysisRequest::AssetVendor(_) => AnalysisMode::AssetVendor,
            AnalysisRequest::InstructorPhoto(_) => AnalysisMode::InstructorPhoto,
            AnalysisRequest::OfficerPhoto(_) => AnalysisMode::OfficerPhoto,
            AnalysisRequest::Text(_) => AnalysisMode::Text,
            AnalysisRequest::Ethical(_) => AnalysisMode::Ethical,
            AnalysisRequest::ComplianceGuidance(_) => AnalysisMode::ComplianceGuidance,
        }
    }

    /// Category tag carried by concern-style requests
    pub fn category(&self) -> Option<&str> {
        match self {
            AnalysisRequest::ComplianceGuidance(concern) | AnalysisRequest::Ethical(concern) => {
                concern.category.as_deref()
            }
            _ => None,
        }
    }

    /// The user's own words, for requests that have them
    pub fn question(&self) -> Option<&str> {
        match self {
            AnalysisRequest::Text(text) => Some(&text.question),
            AnalysisRequest::Ethical(concern) | AnalysisRequest::ComplianceGuidance(concern) => {
                Some(&concern.question)
            }
            _ => None,
        }
    }

    /// Build the ordered message list for the upstream call.
    ///
    /// One system message, then (text mode only) the most recent prior turns,
    /// then one user message carrying the payload.
    pub fn build_messages(&self) -> GatewayResult<Vec<Message>> {
        let mut messages = vec![Message::system(self.system_prompt())];

        match self {
            AnalysisRequest::FacilityMetrics(metrics) => {
                let rendered = serde_json::to_string_pretty(&metrics.data)
                    .map_err(|e| GatewayError::invalid("facilityData", e.to_string()))?;
                messages.push(Message::user(format!(
                    "Analyze this facility equipment data:\n\n{}",
                    rendered
                )));
            }
            AnalysisRequest::Operational(data) => {
                messages.push(Message::user(data.render()));
            }
            AnalysisRequest::AssetVendor(data) => {
                messages.push(Message::user(data.render()));
            }
            AnalysisRequest::InstructorPhoto(batch) => {
                let intro = format!(
                    "Analyze these {} facility/equipment photo(s) for mechanical issues, safety concerns, and maintenance needs. Provide detailed technical guidance.",
                    batch.count()
                );
                messages.push(Message::user_parts(batch.parts(intro)?));
            }
            AnalysisRequest::OfficerPhoto(batch) => {
                let intro = format!(
                    "Analyze these {} facility/equipment photo(s) for mechanical issues, safety hazards, and operational concerns. Provide your analysis in the required JSON format.",
                    batch.count()
                );
                messages.push(Message::user_parts(batch.parts(intro)?));
            }
            AnalysisRequest::Text(text) => {
                require_text("question", &text.question)?;
                messages.extend(text.recent_history().iter().map(ConversationTurn::to_message));
                messages.push(Message::user(text.question.clone()));
            }
            AnalysisRequest::Ethical(concern) | AnalysisRequest::ComplianceGuidance(concern) => {
                require_text("question", &concern.question)?;
                messages.push(Message::user(concern.question.clone()));
            }
        }

        Ok(messages)
    }

    /// System instruction with per-request placeholders filled in
    pub fn system_prompt(&self) -> String {
        let template = profile(self.mode()).template();
        match self {
            AnalysisRequest::InstructorPhoto(batch) => {
                template.replace("{photo_count}", &batch.count().to_string())
            }
            AnalysisRequest::ComplianceGuidance(concern) => template.replace(
                "{category}",
                concern
                    .category
                    .as_deref()
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or("General inquiry"),
            ),
            AnalysisRequest::Text(text) if !text.history.is_empty() => {
                template + CONVERSATION_CONTEXT_NOTE
            }
            _ => template,
        }
    }
}

fn require_text(field: &str, value: &str) -> GatewayResult<()> {
    if value.trim().is_empty() {
        return Err(GatewayError::invalid(field, "cannot be empty"));
    }
    Ok(())
}

fn or_not_specified(value: &Option<String>) -> &str {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(NOT_SPECIFIED)
}

fn render_fields(heading: &str, fields: &[(&str, &Option<String>)]) -> String {
    let mut out = format!("{}\n", heading);
    for (label, value) in fields {
        out.push_str(&format!("{}: {}\n", label, or_not_specified(value)));
    }
    out.push_str("\nProvide your analysis in the required JSON format.");
    out
}

impl OperationalData {
    /// Labeled plain-text block sent as the user message
    pub fn render(&self) -> String {
        render_fields(
            "Analyze this operational data:",
            &[
                ("Equipment ID", &self.equipment_id),
                ("System Type", &self.system_type),
                ("Performance Metrics", &self.performance_metrics),
                ("Asset Status", &self.asset_status),
                ("Operator Notes", &self.operator_notes),
                ("Recent Maintenance", &self.maintenance_logs),
                ("Compliance Status", &self.compliance_status),
            ],
        )
    }
}

impl AssetVendorData {
    /// Labeled plain-text block sent as the user message
    pub fn render(&self) -> String {
        render_fields(
            "Analyze this asset/vendor data:",
            &[
                ("Asset ID", &self.asset_id),
                ("Asset Type", &self.asset_type),
                ("Vendor/Contractor", &self.vendor_name),
                ("Contract Type", &self.contract_type),
                ("SLA Terms", &self.sla_terms),
                ("Performance Notes", &self.performance_notes),
                ("Cost Data", &self.cost_data),
                ("Issue History", &self.issue_history),
            ],
        )
    }
}

impl PhotoBatch {
    /// Create a batch whose declared count matches its payloads
    pub fn new(photos: Vec<String>) -> Self {
        let declared_count = Some(photos.len());
        Self {
            photos,
            declared_count,
        }
    }

    /// Declared photo count, falling back to the number of payloads
    pub fn count(&self) -> usize {
        self.declared_count.unwrap_or(self.photos.len())
    }

    /// One leading text part followed by one image part per payload
    fn parts(&self, intro: String) -> GatewayResult<Vec<ContentPart>> {
        if self.photos.is_empty() {
            return Err(GatewayError::invalid(
                "photos",
                "at least one photo is required",
            ));
        }
        if let Some(declared) = self.declared_count {
            if declared != self.photos.len() {
                warn!(
                    declared,
                    received = self.photos.len(),
                    "Declared photo count differs from attached photos"
                );
            }
        }
        for (index, photo) in self.photos.iter().enumerate() {
            match image_media_type(photo) {
                Some(media) if SUPPORTED_IMAGE_TYPES.contains(&media.as_str()) => {}
                other => warn!(
                    photo = index + 1,
                    media_type = ?other,
                    "Photo is not a JPEG or PNG data URI"
                ),
            }
        }

        let mut parts = Vec::with_capacity(self.photos.len() + 1);
        parts.push(ContentPart::text(intro));
        parts.extend(self.photos.iter().map(ContentPart::image));
        Ok(parts)
    }
}

/// Media type of a `data:` URI, lowercased
pub fn image_media_type(payload: &str) -> Option<String> {
    let rest = payload.strip_prefix("data:")?;
    let end = rest.find([';', ','])?;
    Some(rest[..end].trim().to_lowercase())
}

impl ConversationTurn {
    /// Create a turn
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// `user` stays a user turn; any other role is replayed as the assistant
    fn to_message(&self) -> Message {
        if self.role == "user" {
            Message::user(self.content.clone())
        } else {
            Message::assistant(self.content.clone())
        }
    }
}

impl TextQuestion {
    /// The most recent turns, in original order
    pub fn recent_history(&self) -> &[ConversationTurn] {
        let skip = self.history.len().saturating_sub(MAX_HISTORY_TURNS);
        &self.history[skip..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MessageContent, MessageRole};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn png(n: usize) -> String {
        format!("data:image/png;base64,iVBORw0KGgo{}", n)
    }

    #[test]
    fn test_text_keeps_last_five_turns_in_order() {
        let history: Vec<ConversationTurn> = (1..=7)
            .map(|i| {
                ConversationTurn::new(if i % 2 == 1 { "user" } else { "assistant" }, format!("turn {}", i))
            })
            .collect();
        let request = AnalysisRequest::Text(TextQuestion {
            question: "What next?".to_string(),
            history,
        });

        let messages = request.build_messages().unwrap();
        assert_eq!(messages.len(), 1 + 5 + 1);
        let forwarded: Vec<&str> = messages[1..6].iter().filter_map(Message::text).collect();
        assert_eq!(forwarded, vec!["turn 3", "turn 4", "turn 5", "turn 6", "turn 7"]);
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[2].role, MessageRole::Assistant);
        assert_eq!(messages[6].text(), Some("What next?"));
        assert!(messages[0].text().unwrap().ends_with(CONVERSATION_CONTEXT_NOTE));
    }

    #[test]
    fn test_unknown_roles_replay_as_assistant() {
        let request = AnalysisRequest::Text(TextQuestion {
            question: "q".to_string(),
            history: vec![ConversationTurn::new("system", "injected")],
        });
        let messages = request.build_messages().unwrap();
        assert_eq!(messages[1].role, MessageRole::Assistant);
    }

    #[test]
    fn test_text_without_history_has_no_context_note() {
        let request = AnalysisRequest::Text(TextQuestion {
            question: "Why does the chiller trip?".to_string(),
            history: vec![],
        });
        let messages = request.build_messages().unwrap();
        assert_eq!(messages.len(), 2);
        assert!(!messages[0].text().unwrap().contains(CONVERSATION_CONTEXT_NOTE));
    }

    #[test]
    fn test_photo_message_has_one_text_part_then_images() {
        let request = AnalysisRequest::InstructorPhoto(PhotoBatch {
            photos: vec![png(1), png(2), png(3)],
            declared_count: Some(3),
        });
        let messages = request.build_messages().unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].text().unwrap().contains("all 3 photo(s)"));

        let MessageContent::Parts(parts) = &messages[1].content else {
            panic!("photo request must use multi-part content");
        };
        assert_eq!(parts.len(), 4);
        assert!(matches!(&parts[0], ContentPart::Text { text } if text.contains("these 3")));
        let images = parts
            .iter()
            .filter(|part| matches!(part, ContentPart::ImageUrl { .. }))
            .count();
        assert_eq!(images, 3);
        assert_eq!(parts[1], ContentPart::image(png(1)));
    }

    #[test]
    fn test_officer_photo_asks_for_json() {
        let request = AnalysisRequest::OfficerPhoto(PhotoBatch::new(vec![png(1)]));
        let messages = request.build_messages().unwrap();
        let MessageContent::Parts(parts) = &messages[1].content else {
            panic!("expected parts");
        };
        assert!(matches!(&parts[0], ContentPart::Text { text } if text.contains("JSON")));
    }

    #[test]
    fn test_photo_without_images_is_invalid() {
        let request = AnalysisRequest::OfficerPhoto(PhotoBatch::default());
        let err = request.build_messages().unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest { ref field, .. } if field == "photos"));
    }

    #[test]
    fn test_photo_count_falls_back_to_payloads() {
        let batch = PhotoBatch {
            photos: vec![png(1), png(2)],
            declared_count: None,
        };
        assert_eq!(batch.count(), 2);
    }

    #[test]
    fn test_operational_render_marks_missing_fields() {
        let data = OperationalData {
            equipment_id: Some("AHU-3".to_string()),
            operator_notes: Some("   ".to_string()),
            ..Default::default()
        };
        let rendered = data.render();
        assert!(rendered.starts_with("Analyze this operational data:\n"));
        assert!(rendered.contains("Equipment ID: AHU-3\n"));
        assert!(rendered.contains("Operator Notes: Not specified\n"));
        assert!(rendered.contains("Recent Maintenance: Not specified\n"));
        assert!(rendered.ends_with("Provide your analysis in the required JSON format."));
    }

    #[test]
    fn test_asset_vendor_render() {
        let data = AssetVendorData {
            vendor_name: Some("CoolAir LLC".to_string()),
            ..Default::default()
        };
        let rendered = data.render();
        assert!(rendered.contains("Vendor/Contractor: CoolAir LLC\n"));
        assert!(rendered.contains("SLA Terms: Not specified\n"));
    }

    #[test]
    fn test_operational_data_deserializes_camel_case() {
        let data: OperationalData = serde_json::from_value(json!({
            "equipmentId": "CH-1",
            "maintenanceLogs": "Replaced filter",
            "unrelated": 42
        }))
        .unwrap();
        assert_eq!(data.equipment_id.as_deref(), Some("CH-1"));
        assert_eq!(data.maintenance_logs.as_deref(), Some("Replaced filter"));
        assert_eq!(data.system_type, None);
    }

    #[test]
    fn test_facility_metrics_message() {
        let mut data = Map::new();
        data.insert("equipmentId".to_string(), json!("B-7"));
        data.insert("efficiency".to_string(), json!(81.5));
        let request = AnalysisRequest::FacilityMetrics(FacilityMetrics {
            focus: FacilityFocus::Training,
            data,
        });
        assert_eq!(request.mode(), AnalysisMode::FacilityTraining);

        let messages = request.build_messages().unwrap();
        let user = messages[1].text().unwrap();
        assert!(user.starts_with("Analyze this facility equipment data:\n\n{"));
        assert!(user.contains("\"equipmentId\": \"B-7\""));
        assert!(messages[0].text().unwrap().contains("Operator training"));
    }

    #[test]
    fn test_compliance_category_defaults() {
        let request = AnalysisRequest::ComplianceGuidance(Concern {
            question: "Coworker skipped lockout".to_string(),
            category: None,
        });
        assert!(request
            .system_prompt()
            .contains("Category context: General inquiry"));

        let request = AnalysisRequest::ComplianceGuidance(Concern {
            question: "Coworker skipped lockout".to_string(),
            category: Some("Safety".to_string()),
        });
        assert!(request.system_prompt().contains("Category context: Safety"));
        assert_eq!(request.category(), Some("Safety"));
    }

    #[test]
    fn test_blank_question_is_invalid() {
        let request = AnalysisRequest::Ethical(Concern {
            question: "  ".to_string(),
            category: None,
        });
        assert!(matches!(
            request.build_messages(),
            Err(GatewayError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn test_image_media_type() {
        assert_eq!(image_media_type(&png(1)).as_deref(), Some("image/png"));
        assert_eq!(
            image_media_type("data:IMAGE/JPEG;base64,/9j/").as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(image_media_type("https://example.com/a.png"), None);
    }
}
