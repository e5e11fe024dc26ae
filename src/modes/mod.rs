//! Analysis modes.
//!
//! Every request resolves to exactly one [`AnalysisMode`] at the HTTP
//! boundary. The mode selects:
//! - the system template and output contract ([`registry`])
//! - the request payload and message layout ([`AnalysisRequest`])
//! - how the reply is interpreted ([`extract_structured`], [`severity`])

mod extract;
pub mod registry;
mod request;
pub mod severity;
mod wire;

pub use extract::*;
pub use registry::{profile, Inference, ModeProfile, OutputContract};
pub use request::*;
pub use severity::Severity;
pub use wire::*;

use serde::{Deserialize, Serialize};

/// Gateway family a mode belongs to; each family has its own endpoint and model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GatewayFamily {
    /// Virtual facility instructor: photos, questions, ethical guidance.
    Instructor,
    /// Facility intelligence officer: structured JSON analyses and compliance guidance.
    Officer,
    /// Facility metrics analysis with a fixed report layout.
    Facility,
}

impl GatewayFamily {
    /// Endpoint name for the family
    pub fn endpoint(&self) -> &'static str {
        match self {
            GatewayFamily::Instructor => "vvfi-instructor",
            GatewayFamily::Officer => "vvfo-officer",
            GatewayFamily::Facility => "analyze-facility",
        }
    }
}

/// Analysis mode types.
///
/// `photo` and `compliance` are each used by two families on the wire; the
/// variants here are unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisMode {
    /// Facility telemetry, performance focus.
    FacilityPerformance,
    /// Facility telemetry, compliance focus.
    FacilityCompliance,
    /// Facility telemetry, training focus.
    FacilityTraining,
    /// Structured operational data.
    Operational,
    /// Asset and vendor data.
    AssetVendor,
    /// Instructor photo analysis with heading-based output.
    InstructorPhoto,
    /// Officer photo analysis with JSON output.
    OfficerPhoto,
    /// Free-text technical question with history.
    Text,
    /// Confidential ethical and workplace-safety concern.
    Ethical,
    /// Compliance and ethics guidance.
    ComplianceGuidance,
}

impl AnalysisMode {
    /// All modes, in registry order
    pub const ALL: [AnalysisMode; 10] = [
        AnalysisMode::FacilityPerformance,
        AnalysisMode::FacilityCompliance,
        AnalysisMode::FacilityTraining,
        AnalysisMode::Operational,
        AnalysisMode::AssetVendor,
        AnalysisMode::InstructorPhoto,
        AnalysisMode::OfficerPhoto,
        AnalysisMode::Text,
        AnalysisMode::Ethical,
        AnalysisMode::ComplianceGuidance,
    ];

    /// Get the unambiguous mode name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::FacilityPerformance => "facility-performance",
            AnalysisMode::FacilityCompliance => "facility-compliance",
            AnalysisMode::FacilityTraining => "facility-training",
            AnalysisMode::Operational => "operational",
            AnalysisMode::AssetVendor => "asset-vendor",
            AnalysisMode::InstructorPhoto => "instructor-photo",
            AnalysisMode::OfficerPhoto => "officer-photo",
            AnalysisMode::Text => "text",
            AnalysisMode::Ethical => "ethical",
            AnalysisMode::ComplianceGuidance => "compliance-guidance",
        }
    }

    /// The `mode` word callers send on the wire
    pub fn wire_name(&self) -> &'static str {
        match self {
            AnalysisMode::FacilityPerformance => "performance",
            AnalysisMode::FacilityCompliance | AnalysisMode::ComplianceGuidance => "compliance",
            AnalysisMode::FacilityTraining => "training",
            AnalysisMode::Operational => "operational",
            AnalysisMode::AssetVendor => "asset-vendor",
            AnalysisMode::InstructorPhoto | AnalysisMode::OfficerPhoto => "photo",
            AnalysisMode::Text => "text",
            AnalysisMode::Ethical => "ethical",
        }
    }

    /// Label used in activity-log records
    pub fn display_label(&self) -> &'static str {
        match self {
            AnalysisMode::FacilityPerformance => "Performance",
            AnalysisMode::FacilityCompliance => "Facility Compliance",
            AnalysisMode::FacilityTraining => "Training",
            AnalysisMode::Operational => "Operational",
            AnalysisMode::AssetVendor => "Asset-Vendor",
            AnalysisMode::InstructorPhoto | AnalysisMode::OfficerPhoto => "Photo",
            AnalysisMode::Text => "Text",
            AnalysisMode::Ethical => "Ethical",
            AnalysisMode::ComplianceGuidance => "Compliance",
        }
    }

    /// Family that serves this mode
    pub fn family(&self) -> GatewayFamily {
        match self {
            AnalysisMode::FacilityPerformance
            | AnalysisMode::FacilityCompliance
            | AnalysisMode::FacilityTraining => GatewayFamily::Facility,
            AnalysisMode::Operational
            | AnalysisMode::AssetVendor
            | AnalysisMode::OfficerPhoto
            | AnalysisMode::ComplianceGuidance => GatewayFamily::Officer,
            AnalysisMode::InstructorPhoto | AnalysisMode::Text | AnalysisMode::Ethical => {
                GatewayFamily::Instructor
            }
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        AnalysisMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == lowered)
            .ok_or_else(|| format!("Unknown analysis mode: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_mode_as_str_round_trips_through_from_str() {
        for mode in AnalysisMode::ALL {
            assert_eq!(mode.as_str().parse::<AnalysisMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_analysis_mode_from_str_case_insensitive() {
        assert_eq!(
            "ASSET-VENDOR".parse::<AnalysisMode>().unwrap(),
            AnalysisMode::AssetVendor
        );
        assert_eq!(
            "Officer-Photo".parse::<AnalysisMode>().unwrap(),
            AnalysisMode::OfficerPhoto
        );
    }

    #[test]
    fn test_analysis_mode_from_str_invalid() {
        let result = "photo".parse::<AnalysisMode>();
        assert_eq!(result.unwrap_err(), "Unknown analysis mode: photo");
    }

    #[test]
    fn test_wire_names_are_shared_across_families() {
        assert_eq!(AnalysisMode::InstructorPhoto.wire_name(), "photo");
        assert_eq!(AnalysisMode::OfficerPhoto.wire_name(), "photo");
        assert_eq!(AnalysisMode::FacilityCompliance.wire_name(), "compliance");
        assert_eq!(AnalysisMode::ComplianceGuidance.wire_name(), "compliance");
        assert_ne!(
            AnalysisMode::InstructorPhoto.family(),
            AnalysisMode::OfficerPhoto.family()
        );
    }

    #[test]
    fn test_family_endpoints() {
        assert_eq!(AnalysisMode::Text.family().endpoint(), "vvfi-instructor");
        assert_eq!(AnalysisMode::AssetVendor.family().endpoint(), "vvfo-officer");
        assert_eq!(
            AnalysisMode::FacilityTraining.family().endpoint(),
            "analyze-facility"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", AnalysisMode::ComplianceGuidance), "compliance-guidance");
    }
}
