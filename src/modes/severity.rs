//! Severity and flag inference over model replies.
//!
//! All of this is keyword matching over prose. False positives ("low" inside
//! "follow") and false negatives (paraphrased danger) are accepted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Phrases that mark a reply as critical
pub const CRITICAL_KEYWORDS: &[&str] = &[
    "critical",
    "immediate danger",
    "call 911",
    "assault",
    "imminent harm",
    "life safety",
];

/// Phrases that mark a reply as needing escalation
pub const ESCALATION_KEYWORDS: &[&str] = &[
    "formal reporting",
    "escalation",
    "human resources",
    "legal",
    "authorities",
];

/// Confidence reported when a structured reply carries none
pub const DEFAULT_STRUCTURED_CONFIDENCE: f64 = 0.85;

/// Report heading whose body carries the severity label
pub const REPORT_SEVERITY_HEADING: &str = "## Severity Level";

/// Coarse ordinal risk label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    /// Get the label as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Parse a model-written risk label such as `"High"` or `"critical - act now"`.
    ///
    /// Only the leading word counts; `"medium"` reads as `Moderate`.
    pub fn from_label(label: &str) -> Option<Self> {
        let word: String = label
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_lowercase();
        match word.as_str() {
            "low" => Some(Severity::Low),
            "moderate" | "medium" => Some(Severity::Moderate),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Moderate
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Flags raised by the critical and escalation scans
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SafeguardingFlags {
    pub critical: bool,
    pub requires_escalation: bool,
}

impl SafeguardingFlags {
    /// Severity implied by the flags
    pub fn severity(&self) -> Severity {
        if self.critical {
            Severity::Critical
        } else {
            Severity::Moderate
        }
    }
}

fn contains_any(lowered: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| lowered.contains(keyword))
}

/// Scan a reply for critical and escalation phrases, ignoring case
pub fn scan_safeguarding(reply: &str) -> SafeguardingFlags {
    let lowered = reply.to_lowercase();
    SafeguardingFlags {
        critical: contains_any(&lowered, CRITICAL_KEYWORDS),
        requires_escalation: contains_any(&lowered, ESCALATION_KEYWORDS),
    }
}

/// Severity from the highest-ranked keyword present: critical, then high, then low.
///
/// Defaults to `Moderate` when none appear.
pub fn keyword_severity(reply: &str) -> Severity {
    let lowered = reply.to_lowercase();
    [
        ("critical", Severity::Critical),
        ("high", Severity::High),
        ("low", Severity::Low),
    ]
    .into_iter()
    .find(|(keyword, _)| lowered.contains(keyword))
    .map(|(_, severity)| severity)
    .unwrap_or_default()
}

/// Severity label written under the report's `## Severity Level` heading.
///
/// Only that section is read, up to the next heading, and only whole words
/// count. Defaults to `Moderate` when the section or a label is missing.
pub fn report_severity(reply: &str) -> Severity {
    let lowered = reply.to_ascii_lowercase();
    let heading = REPORT_SEVERITY_HEADING.to_ascii_lowercase();
    let Some(start) = lowered.find(&heading) else {
        return Severity::default();
    };

    let section = &lowered[start + heading.len()..];
    let section = section
        .find("\n#")
        .map_or(section, |end| &section[..end]);

    section
        .split(|c: char| !c.is_ascii_alphabetic())
        .find_map(Severity::from_label)
        .unwrap_or_default()
}

/// `Risk_Level` of a structured reply, when present and recognizable
pub fn structured_severity(structured: &Value) -> Option<Severity> {
    structured
        .get("Risk_Level")
        .and_then(Value::as_str)
        .and_then(Severity::from_label)
}

/// `Confidence_Score` of a structured reply normalized into `[0, 1]`.
///
/// Numbers above 1 and up to 100 are read as percentages. Numeric strings are
/// accepted; zero and negative values are treated as absent.
pub fn structured_confidence(structured: &Value) -> Option<f64> {
    let raw = match structured.get("Confidence_Score")? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().trim_end_matches('%').parse::<f64>().ok()?,
        _ => return None,
    };

    if !raw.is_finite() || raw <= 0.0 {
        return None;
    }
    let normalized = if raw > 1.0 { raw / 100.0 } else { raw };
    Some(normalized.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Moderate);
        assert!(Severity::Moderate > Severity::Low);
    }

    #[test]
    fn test_severity_serializes_as_label() {
        assert_eq!(serde_json::to_value(Severity::High).unwrap(), json!("High"));
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Severity::from_label("High"), Some(Severity::High));
        assert_eq!(Severity::from_label("  CRITICAL "), Some(Severity::Critical));
        assert_eq!(Severity::from_label("medium"), Some(Severity::Moderate));
        assert_eq!(
            Severity::from_label("Low - monitor weekly"),
            Some(Severity::Low)
        );
        assert_eq!(Severity::from_label("severe"), None);
        assert_eq!(Severity::from_label(""), None);
    }

    #[test]
    fn test_immediate_danger_is_critical_in_any_case() {
        assert!(scan_safeguarding("There is IMMEDIATE DANGER here").critical);
        assert!(scan_safeguarding("immediate danger").critical);
        assert!(scan_safeguarding("Immediate Danger to staff").critical);
    }

    #[test]
    fn test_no_keywords_is_not_critical() {
        let flags = scan_safeguarding("Document the conversation and talk to your manager.");
        assert!(!flags.critical);
        assert!(!flags.requires_escalation);
        assert_eq!(flags.severity(), Severity::Moderate);
    }

    #[test]
    fn test_escalation_scan_is_independent() {
        let flags = scan_safeguarding("Contact Human Resources and consider legal advice.");
        assert!(!flags.critical);
        assert!(flags.requires_escalation);

        let flags = scan_safeguarding("Life safety risk; this may require formal reporting.");
        assert!(flags.critical);
        assert!(flags.requires_escalation);
        assert_eq!(flags.severity(), Severity::Critical);
    }

    #[test]
    fn test_keyword_severity_priority() {
        assert_eq!(keyword_severity("Overall: Critical"), Severity::Critical);
        assert_eq!(keyword_severity("HIGH wear on belts"), Severity::High);
        assert_eq!(keyword_severity("low refrigerant"), Severity::Low);
        assert_eq!(keyword_severity("nothing notable"), Severity::Moderate);
    }

    #[test]
    fn test_keyword_severity_highest_wins_when_conflicting() {
        assert_eq!(
            keyword_severity("Low risk overall, but one critical breaker fault"),
            Severity::Critical
        );
        assert_eq!(keyword_severity("low pressure, high temperature"), Severity::High);
    }

    #[test]
    fn test_report_severity_reads_only_its_section() {
        let reply = "## Issue Detected\nHigh discharge pressure\n\n## Severity Level\nModerate\n\n## Follow-Up Date\n2026-11-01";
        assert_eq!(report_severity(reply), Severity::Moderate);

        let reply = "## Severity Level: critical, shut down the boiler\n## Root Causes\nlow water";
        assert_eq!(report_severity(reply), Severity::Critical);

        let reply = "## severity level\n**Low** - routine\n";
        assert_eq!(report_severity(reply), Severity::Low);
    }

    #[test]
    fn test_report_severity_ignores_partial_words() {
        let reply = "## Severity Level\nFollow the highlighted steps\n## Root Causes\nCritical filter clog";
        assert_eq!(report_severity(reply), Severity::Moderate);
    }

    #[test]
    fn test_report_severity_without_section() {
        assert_eq!(report_severity("High load, low flow"), Severity::Moderate);
        assert_eq!(report_severity(""), Severity::Moderate);
    }

    #[test]
    fn test_structured_severity() {
        assert_eq!(
            structured_severity(&json!({"Risk_Level": "High"})),
            Some(Severity::High)
        );
        assert_eq!(structured_severity(&json!({"Risk_Level": 3})), None);
        assert_eq!(structured_severity(&json!({"Issue": "x"})), None);
    }

    #[test]
    fn test_structured_confidence() {
        assert_eq!(
            structured_confidence(&json!({"Confidence_Score": 0.72})),
            Some(0.72)
        );
        assert_eq!(
            structured_confidence(&json!({"Confidence_Score": 90})),
            Some(0.9)
        );
        assert_eq!(
            structured_confidence(&json!({"Confidence_Score": "0.6"})),
            Some(0.6)
        );
        assert_eq!(
            structured_confidence(&json!({"Confidence_Score": 250})),
            Some(1.0)
        );
        assert_eq!(structured_confidence(&json!({"Confidence_Score": 0})), None);
        assert_eq!(structured_confidence(&json!({})), None);
    }
}
