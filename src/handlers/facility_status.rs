use crate::{
    entities::{facility_status, FacilityStatusKind},
    services::facility_status::parse_status,
    ApiResult, AppState,
};
use super::extract::ApiJson;
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "name": "Roller Coaster", "status": "Crowded" }))]
pub struct FacilityStatusResponse {
    pub name: String,
    pub status: FacilityStatusKind,
}

impl From<facility_status::Model> for FacilityStatusResponse {
    fn from(model: facility_status::Model) -> Self {
        Self {
            name: model.name,
            status: model.status,
        }
    }
}

/// Body of a status update. Kept as free text so an unknown value is reported
/// together with the accepted ones.
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({ "status": "Breakdown" }))]
pub struct UpdateStatusRequest {
    /// One of Normal, Crowded, Breakdown
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/api/facility-status",
    responses(
        (status = 200, description = "Status of every facility", body = Vec<FacilityStatusResponse>),
        (status = 503, description = "Store unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "facility-status"
)]
pub async fn list_statuses(
    State(state): State<AppState>,
) -> ApiResult<Vec<FacilityStatusResponse>> {
    let statuses = state.services.facility_status.get_all_statuses().await?;
    Ok(Json(
        statuses
            .into_iter()
            .map(FacilityStatusResponse::from)
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/facility-status/:facility",
    params(
        ("facility" = String, Path, description = "Facility name")
    ),
    responses(
        (status = 200, description = "Current status", body = FacilityStatusResponse),
        (status = 404, description = "Facility not found", body = crate::errors::ErrorResponse)
    ),
    tag = "facility-status"
)]
pub async fn get_status(
    State(state): State<AppState>,
    Path(facility): Path<String>,
) -> ApiResult<FacilityStatusResponse> {
    let status = state.services.facility_status.get_status(&facility).await?;
    Ok(Json(status.into()))
}

#[utoipa::path(
    post,
    path = "/api/facility-status/:facility",
    params(
        ("facility" = String, Path, description = "Facility name")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status as stored after the update", body = FacilityStatusResponse),
        (status = 400, description = "Unknown status value or malformed body", body = crate::errors::ErrorResponse),
        (status = 404, description = "Facility not found", body = crate::errors::ErrorResponse)
    ),
    tag = "facility-status"
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(facility): Path<String>,
    ApiJson(payload): ApiJson<UpdateStatusRequest>,
) -> ApiResult<FacilityStatusResponse> {
    let status = parse_status(&payload.status)?;
    let updated = state
        .services
        .facility_status
        .set_status(&facility, status)
        .await?;
    Ok(Json(updated.into()))
}
