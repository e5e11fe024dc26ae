//! JSON request bodies accepted by each endpoint.
//!
//! Bodies are loose on purpose: fields belonging to other modes are accepted
//! and ignored. Each body resolves into exactly one [`AnalysisRequest`].

use serde::Deserialize;
use serde_json::Value;

use super::request::{
    AnalysisRequest, AssetVendorData, Concern, ConversationTurn, FacilityFocus, FacilityMetrics,
    OperationalData, PhotoBatch, TextQuestion,
};
use crate::error::{GatewayError, GatewayResult};

/// Body of `POST /vvfi-instructor`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorBody {
    pub mode: String,
    pub photos: Option<Vec<String>>,
    pub photo_count: Option<usize>,
    pub question: Option<String>,
    pub conversation_history: Option<Vec<ConversationTurn>>,
    pub category: Option<String>,
}

/// Body of `POST /vvfo-officer`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerBody {
    pub mode: String,
    pub data: Option<Value>,
    pub photos: Option<Vec<String>>,
    pub photo_count: Option<usize>,
    pub question: Option<String>,
    pub category: Option<String>,
}

/// Body of `POST /analyze-facility`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityBody {
    #[serde(alias = "analysisType")]
    pub mode: String,
    #[serde(alias = "data")]
    pub facility_data: Option<Value>,
}

fn unknown_mode(mode: &str, endpoint: &str) -> GatewayError {
    GatewayError::invalid("mode", format!("'{}' is not a {} mode", mode, endpoint))
}

fn photo_batch(photos: Option<Vec<String>>, photo_count: Option<usize>) -> PhotoBatch {
    PhotoBatch {
        photos: photos.unwrap_or_default(),
        declared_count: photo_count,
    }
}

fn structured<T: serde::de::DeserializeOwned + Default>(
    data: Option<Value>,
) -> GatewayResult<T> {
    match data {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => {
            serde_json::from_value(value).map_err(|e| GatewayError::invalid("data", e.to_string()))
        }
    }
}

impl TryFrom<InstructorBody> for AnalysisRequest {
    type Error = GatewayError;

    fn try_from(body: InstructorBody) -> GatewayResult<Self> {
        match body.mode.as_str() {
            "photo" => Ok(AnalysisRequest::InstructorPhoto(photo_batch(
                body.photos,
                body.photo_count,
            ))),
            "text" => Ok(AnalysisRequest::Text(TextQuestion {
                question: body.question.unwrap_or_default(),
                history: body.conversation_history.unwrap_or_default(),
            })),
            "ethical" => Ok(AnalysisRequest::Ethical(Concern {
                question: body.question.unwrap_or_default(),
                category: body.category,
            })),
            other => Err(unknown_mode(other, "vvfi-instructor")),
        }
    }
}

impl TryFrom<OfficerBody> for AnalysisRequest {
    type Error = GatewayError;

    fn try_from(body: OfficerBody) -> GatewayResult<Self> {
        match body.mode.as_str() {
            "operational" => Ok(AnalysisRequest::Operational(structured::<OperationalData>(
                body.data,
            )?)),
            "asset-vendor" => Ok(AnalysisRequest::AssetVendor(structured::<AssetVendorData>(
                body.data,
            )?)),
            "photo" => Ok(AnalysisRequest::OfficerPhoto(photo_batch(
                body.photos,
                body.photo_count,
            ))),
            "compliance" => Ok(AnalysisRequest::ComplianceGuidance(Concern {
                question: body.question.unwrap_or_default(),
                category: body.category,
            })),
            other => Err(unknown_mode(other, "vvfo-officer")),
        }
    }
}

impl TryFrom<FacilityBody> for AnalysisRequest {
    type Error = GatewayError;

    fn try_from(body: FacilityBody) -> GatewayResult<Self> {
        let focus = match body.mode.as_str() {
            "performance" => FacilityFocus::Performance,
            "compliance" => FacilityFocus::Compliance,
            "training" => FacilityFocus::Training,
            other => return Err(unknown_mode(other, "analyze-facility")),
        };
        let data = match body.facility_data {
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(GatewayError::invalid(
                    "facilityData",
                    "must be a JSON object",
                ))
            }
            None => return Err(GatewayError::invalid("facilityData", "is required")),
        };
        Ok(AnalysisRequest::FacilityMetrics(FacilityMetrics { focus, data }))
    }
}
