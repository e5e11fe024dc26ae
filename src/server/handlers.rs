use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::SharedState;
use crate::error::{GatewayError, GatewayResult};
use crate::events::GatewayEvent;
use crate::gateway::AnalysisResult;
use crate::modes::{AnalysisRequest, FacilityBody, InstructorBody, OfficerBody};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Body of `POST /compliance-log`
#[derive(Debug, Clone, Deserialize)]
pub struct ComplianceLogBody {
    /// Report kind, e.g. `Photo` or `operational`.
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    /// Flag the report for leadership review instead of plain logging.
    #[serde(default)]
    pub review: bool,
}

/// Acknowledgement for fire-and-forget endpoints
#[derive(Debug, Serialize)]
pub struct Accepted {
    pub accepted: bool,
}

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> GatewayResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| GatewayError::invalid("body", rejection.body_text()))
}

/// Decode an analysis body, checking the credential before the mode payload
fn analysis_request<T>(
    state: &SharedState,
    body: Result<Json<T>, JsonRejection>,
) -> GatewayResult<AnalysisRequest>
where
    AnalysisRequest: TryFrom<T, Error = GatewayError>,
{
    let body = parse_body(body)?;
    state.gateway.ensure_configured()?;
    AnalysisRequest::try_from(body)
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /vvfi-instructor`
pub async fn vvfi_instructor(
    State(state): State<SharedState>,
    body: Result<Json<InstructorBody>, JsonRejection>,
) -> GatewayResult<Json<AnalysisResult>> {
    let request = analysis_request(&state, body)?;
    let result = state.gateway.analyze(request).await?;
    Ok(Json(result))
}

/// `POST /vvfo-officer`
pub async fn vvfo_officer(
    State(state): State<SharedState>,
    body: Result<Json<OfficerBody>, JsonRejection>,
) -> GatewayResult<Json<AnalysisResult>> {
    let request = analysis_request(&state, body)?;
    let result = state.gateway.analyze(request).await?;
    Ok(Json(result))
}

/// `POST /analyze-facility`
pub async fn analyze_facility(
    State(state): State<SharedState>,
    body: Result<Json<FacilityBody>, JsonRejection>,
) -> GatewayResult<Json<AnalysisResult>> {
    let request = analysis_request(&state, body)?;
    let result = state.gateway.analyze(request).await?;
    Ok(Json(result))
}

/// `POST /compliance-log`: forward a finished report to the compliance portal
pub async fn compliance_log(
    State(state): State<SharedState>,
    body: Result<Json<ComplianceLogBody>, JsonRejection>,
) -> GatewayResult<(StatusCode, Json<Accepted>)> {
    let body = parse_body(body)?;
    if body.kind.trim().is_empty() {
        return Err(GatewayError::invalid("type", "cannot be empty"));
    }

    let event = if body.review {
        GatewayEvent::review_flag(&body.kind, &body.content)
    } else {
        GatewayEvent::compliance_log(&body.kind, &body.content)
    };
    info!(kind = %body.kind, review = body.review, "Compliance report accepted");
    state.gateway.events().emit(vec![event]);

    Ok((StatusCode::ACCEPTED, Json(Accepted { accepted: true })))
}
