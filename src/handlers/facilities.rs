use crate::{
    entities::fixed_data, services::facilities::FacilitySnapshot, ApiResult, AppState,
};
use super::extract::ApiQuery;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SnapshotQuery {
    /// Number of rows; capped at the configured dashboard size
    pub limit: Option<u64>,
}

/// Static reference data for one facility
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "facility_id": 1,
    "name": "Roller Coaster",
    "maximum_capacity": 24,
    "runtime": "09:00-21:00"
}))]
pub struct FacilityResponse {
    pub facility_id: i32,
    pub name: String,
    pub maximum_capacity: i32,
    pub runtime: String,
}

impl From<fixed_data::Model> for FacilityResponse {
    fn from(model: fixed_data::Model) -> Self {
        Self {
            facility_id: model.facility_id,
            name: model.name,
            maximum_capacity: model.maximum_capacity,
            runtime: model.runtime,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/fixed-data",
    responses(
        (status = 200, description = "All facilities", body = Vec<FacilityResponse>),
        (status = 503, description = "Store unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "facilities"
)]
pub async fn get_fixed_data(State(state): State<AppState>) -> ApiResult<Vec<FacilityResponse>> {
    let facilities = state.services.facilities.list_facilities().await?;
    Ok(Json(facilities.into_iter().map(FacilityResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/facilities",
    params(SnapshotQuery),
    responses(
        (status = 200, description = "Facilities with their latest queue sample, most recent first", body = Vec<FacilitySnapshot>),
        (status = 400, description = "Unparsable limit", body = crate::errors::ErrorResponse),
        (status = 503, description = "Store unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "facilities"
)]
pub async fn get_facilities(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SnapshotQuery>,
) -> ApiResult<Vec<FacilitySnapshot>> {
    let cap = state.config.dashboard_limit;
    let limit = query.limit.unwrap_or(cap).min(cap);

    let snapshot = state
        .services
        .facilities
        .list_facilities_with_latest_queue(limit)
        .await?;
    Ok(Json(snapshot))
}
