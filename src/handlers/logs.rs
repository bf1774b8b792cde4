use crate::{
    entities::working_log,
    errors::ServiceError,
    services::working_log::{LogPage, NewLogEntry},
    ApiResult, AppState,
};
use super::extract::{ApiJson, ApiQuery};
use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogListQuery {
    /// Page size; defaults to the configured page and is capped at the configured maximum
    pub limit: Option<u64>,
    /// Return only entries older than this id
    pub before_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 42,
    "facility": "Roller Coaster",
    "log_type": "incident",
    "message": "stopped for inspection",
    "timestamp": "2024-05-01T10:15:00Z"
}))]
pub struct LogEntryResponse {
    pub id: i64,
    pub facility: Option<String>,
    pub log_type: Option<String>,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<working_log::Model> for LogEntryResponse {
    fn from(model: working_log::Model) -> Self {
        Self {
            id: model.id,
            facility: model.facility,
            log_type: model.log_type,
            message: model.message,
            timestamp: model.timestamp,
        }
    }
}

/// All fields are optional free text; only their length is bounded.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "facility": "Roller Coaster",
    "log_type": "incident",
    "message": "stopped"
}))]
pub struct CreateLogRequest {
    #[validate(length(max = 255))]
    pub facility: Option<String>,
    #[validate(length(max = 64))]
    pub log_type: Option<String>,
    #[validate(length(max = 10000))]
    pub message: Option<String>,
}

impl From<CreateLogRequest> for NewLogEntry {
    fn from(req: CreateLogRequest) -> Self {
        Self {
            facility: req.facility,
            log_type: req.log_type,
            message: req.message,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/logs",
    params(LogListQuery),
    responses(
        (status = 200, description = "Log entries, newest first", body = Vec<LogEntryResponse>),
        (status = 400, description = "Unparsable paging parameter or unknown cursor", body = crate::errors::ErrorResponse),
        (status = 503, description = "Store unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "working-log"
)]
pub async fn list_logs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LogListQuery>,
) -> ApiResult<Vec<LogEntryResponse>> {
    let page = LogPage {
        limit: query
            .limit
            .unwrap_or(state.config.log_page_default)
            .clamp(1, state.config.log_page_max),
        before_id: query.before_id,
    };

    let entries = state.services.working_log.list_logs(page).await?;
    Ok(Json(entries.into_iter().map(LogEntryResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/logs",
    request_body = CreateLogRequest,
    responses(
        (status = 201, description = "Entry appended", body = LogEntryResponse),
        (status = 400, description = "Field too long or malformed body", body = crate::errors::ErrorResponse),
        (status = 503, description = "Store unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "working-log"
)]
pub async fn create_log(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateLogRequest>,
) -> Result<(StatusCode, Json<LogEntryResponse>), ServiceError> {
    payload.validate()?;

    let entry = state.services.working_log.append_log(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}
