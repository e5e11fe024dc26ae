//! Static mode table: system template, output contract and reply handling.
//!
//! A template and the contract it promises are one unit. If a template is
//! edited without its contract, extraction for that mode degrades to
//! text-only without any error; the tests below keep the two aligned.

use super::AnalysisMode;
use crate::prompts::{
    FACILITY_COMPLIANCE_FOCUS, FACILITY_PERFORMANCE_FOCUS, FACILITY_PREAMBLE,
    FACILITY_REPORT_FORMAT, FACILITY_TRAINING_FOCUS, INSTRUCTOR_ETHICAL_PROMPT,
    INSTRUCTOR_PHOTO_PROMPT, INSTRUCTOR_TEXT_PROMPT, OFFICER_ASSET_VENDOR_SECTION,
    OFFICER_COMPLIANCE_SECTION, OFFICER_IDENTITY, OFFICER_OPERATIONAL_SECTION,
    OFFICER_PHOTO_SECTION,
};

/// Section headings promised by the instructor photo template
pub const INSTRUCTOR_PHOTO_HEADINGS: &[&str] = &[
    "Photo Analysis Summary:",
    "Detailed Observations:",
    "Identified Issues:",
    "Recommended Actions:",
    "Related References:",
    "Severity Assessment:",
    "Confidence Level:",
];

/// Section headings promised by the text template
pub const TEXT_HEADINGS: &[&str] = &[
    "Question Understanding:",
    "Diagnosis & Analysis:",
    "Step-by-Step Resolution:",
    "Common Causes:",
    "References & Standards:",
    "Pro Tips:",
    "Severity:",
];

/// Section headings promised by the ethical template
pub const ETHICAL_HEADINGS: &[&str] = &[
    "Understanding Your Concern:",
    "Legal & Ethical Context:",
    "Immediate Steps You Should Take:",
    "Critical Safety Information:",
    "Resources & Support:",
    "Confidentiality Note:",
];

/// Numbered sections promised by the compliance guidance template
pub const COMPLIANCE_GUIDANCE_SECTIONS: &[&str] = &[
    "Assessment of the situation",
    "Applicable regulations/policies",
    "Recommended immediate actions",
    "Documentation requirements",
    "Escalation path if needed",
    "Resources and support contacts",
];

/// Report headings promised by every facility-metrics template
pub const FACILITY_REPORT_HEADINGS: &[&str] = &[
    "## Issue Detected",
    "## Severity Level",
    "## Root Causes",
    "## Recommended Actions",
    "## Estimated Risk Cost",
    "## Follow-Up Date",
    "## Compliance Score",
    "## Virtue Score",
];

/// JSON keys promised by the operational template
pub const OPERATIONAL_KEYS: &[&str] = &[
    "Issue",
    "Risk_Level",
    "Operational_Impact",
    "Root_Cause_Signals",
    "Recommended_Actions",
    "Compliance_Notes",
    "Decision_Defensibility",
    "ATI_Path",
    "Confidence_Score",
];

/// JSON keys promised by the asset and vendor template
pub const ASSET_VENDOR_KEYS: &[&str] = &[
    "Asset_Health_Score",
    "Vendor_Performance_Score",
    "Risk_to_Operations_Index",
    "Contract_Status",
    "SLA_Compliance",
    "Escalation_Path",
    "Cost_Impact_Analysis",
    "Recommendations",
    "Documentation_Notes",
];

/// JSON keys promised by the officer photo template
pub const OFFICER_PHOTO_KEYS: &[&str] = &[
    "Observed_Condition",
    "Potential_Risks",
    "Operational_Impact",
    "Safety_Compliance_Considerations",
    "Recommended_Actions",
    "Preventive_Controls_ATI",
    "Risk_Level",
    "Confidence_Score",
];

/// Shape the model is instructed to answer in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputContract {
    /// Free text organized under these literal headings.
    Headings(&'static [&'static str]),
    /// A single JSON object with these keys.
    JsonObject { keys: &'static [&'static str] },
}

impl OutputContract {
    /// Whether the reply should be scanned for a structured object
    pub fn expects_json(&self) -> bool {
        matches!(self, OutputContract::JsonObject { .. })
    }
}

/// How severity and flags are derived from a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inference {
    /// Highest severity keyword found in the prose.
    KeywordSeverity,
    /// Label under the report's severity heading.
    ReportSection,
    /// Critical and escalation keyword scans.
    Safeguarding,
    /// `Risk_Level` and `Confidence_Score` read from the structured object.
    StructuredFields,
}

/// Registry entry for one mode
#[derive(Debug, Clone, Copy)]
pub struct ModeProfile {
    pub mode: AnalysisMode,
    /// Template segments, joined with blank lines.
    pub segments: &'static [&'static str],
    pub contract: OutputContract,
    pub inference: Inference,
    /// Confidence reported when none is read from the reply.
    pub default_confidence: f64,
}

impl ModeProfile {
    /// The system template with placeholders still in place
    pub fn template(&self) -> String {
        self.segments.join("\n\n")
    }
}

/// Look up the registry entry for a mode
pub fn profile(mode: AnalysisMode) -> ModeProfile {
    let (segments, contract, inference, default_confidence): (
        &'static [&'static str],
        OutputContract,
        Inference,
        f64,
    ) = match mode {
        AnalysisMode::FacilityPerformance => (
            &[FACILITY_PREAMBLE, FACILITY_PERFORMANCE_FOCUS, FACILITY_REPORT_FORMAT],
            OutputContract::Headings(FACILITY_REPORT_HEADINGS),
            Inference::ReportSection,
            0.85,
        ),
        AnalysisMode::FacilityCompliance => (
            &[FACILITY_PREAMBLE, FACILITY_COMPLIANCE_FOCUS, FACILITY_REPORT_FORMAT],
            OutputContract::Headings(FACILITY_REPORT_HEADINGS),
            Inference::ReportSection,
            0.85,
        ),
        AnalysisMode::FacilityTraining => (
            &[FACILITY_PREAMBLE, FACILITY_TRAINING_FOCUS, FACILITY_REPORT_FORMAT],
            OutputContract::Headings(FACILITY_REPORT_HEADINGS),
            Inference::ReportSection,
            0.85,
        ),
        AnalysisMode::Operational => (
            &[OFFICER_IDENTITY, OFFICER_OPERATIONAL_SECTION],
            OutputContract::JsonObject {
                keys: OPERATIONAL_KEYS,
            },
            Inference::StructuredFields,
            0.85,
        ),
        AnalysisMode::AssetVendor => (
            &[OFFICER_IDENTITY, OFFICER_ASSET_VENDOR_SECTION],
            OutputContract::JsonObject {
                keys: ASSET_VENDOR_KEYS,
            },
            Inference::StructuredFields,
            0.85,
        ),
        AnalysisMode::OfficerPhoto => (
            &[OFFICER_IDENTITY, OFFICER_PHOTO_SECTION],
            OutputContract::JsonObject {
                keys: OFFICER_PHOTO_KEYS,
            },
            Inference::StructuredFields,
            0.85,
        ),
        AnalysisMode::ComplianceGuidance => (
            &[OFFICER_IDENTITY, OFFICER_COMPLIANCE_SECTION],
            OutputContract::Headings(COMPLIANCE_GUIDANCE_SECTIONS),
            Inference::Safeguarding,
            0.85,
        ),
        AnalysisMode::InstructorPhoto => (
            &[INSTRUCTOR_PHOTO_PROMPT],
            OutputContract::Headings(INSTRUCTOR_PHOTO_HEADINGS),
            Inference::KeywordSeverity,
            0.80,
        ),
        AnalysisMode::Text => (
            &[INSTRUCTOR_TEXT_PROMPT],
            OutputContract::Headings(TEXT_HEADINGS),
            Inference::KeywordSeverity,
            0.90,
        ),
        AnalysisMode::Ethical => (
            &[INSTRUCTOR_ETHICAL_PROMPT],
            OutputContract::Headings(ETHICAL_HEADINGS),
            Inference::Safeguarding,
            0.95,
        ),
    };

    ModeProfile {
        mode,
        segments,
        contract,
        inference,
        default_confidence,
    }
}
