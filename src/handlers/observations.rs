use crate::{
    errors::ServiceError,
    services::observations::{Observation, ObservationQuery, Series},
    ApiResult, AppState,
};
use super::extract::ApiQuery;
use axum::{extract::State, response::Json};
use serde::Deserialize;
use utoipa::IntoParams;

/// Query string shared by both series endpoints
#[derive(Debug, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SeriesQuery {
    /// Comma-joined facility names
    #[param(example = "Roller Coaster,Ferris Wheel")]
    pub facilities: Option<String>,
    /// Inclusive window start
    #[serde(rename = "startDate")]
    #[param(example = "2024-05-01 09:00:00")]
    pub start_date: Option<String>,
    /// Inclusive window end
    #[serde(rename = "endDate")]
    #[param(example = "2024-05-01 21:00:00")]
    pub end_date: Option<String>,
}

impl SeriesQuery {
    fn into_filter(self) -> Result<ObservationQuery, ServiceError> {
        let facilities = require(self.facilities, "facilities")?;
        let start = require(self.start_date, "startDate")?;
        let end = require(self.end_date, "endDate")?;
        ObservationQuery::parse(&facilities, &start, &end)
    }
}

fn require(value: Option<String>, name: &str) -> Result<String, ServiceError> {
    value.ok_or_else(|| ServiceError::InvalidArgument(format!("missing query parameter '{}'", name)))
}

async fn query_series(
    state: &AppState,
    series: Series,
    query: SeriesQuery,
) -> ApiResult<Vec<Observation>> {
    let filter = query.into_filter()?;
    let observations = state
        .services
        .observations
        .query_observations(series, &filter)
        .await?;
    Ok(Json(observations))
}

#[utoipa::path(
    get,
    path = "/api/raw-data",
    params(SeriesQuery),
    responses(
        (status = 200, description = "Raw visitor counts in the window", body = Vec<Observation>),
        (status = 400, description = "Missing facilities or unparsable timestamp", body = crate::errors::ErrorResponse),
        (status = 503, description = "Store unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "observations"
)]
pub async fn get_raw_data(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SeriesQuery>,
) -> ApiResult<Vec<Observation>> {
    query_series(&state, Series::Raw, query).await
}

#[utoipa::path(
    get,
    path = "/api/predict-data",
    params(SeriesQuery),
    responses(
        (status = 200, description = "Predicted visitor counts in the window", body = Vec<Observation>),
        (status = 400, description = "Missing facilities or unparsable timestamp", body = crate::errors::ErrorResponse),
        (status = 503, description = "Store unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "observations"
)]
pub async fn get_predict_data(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SeriesQuery>,
) -> ApiResult<Vec<Observation>> {
    query_series(&state, Series::Predicted, query).await
}
