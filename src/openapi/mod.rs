use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Facility Monitor API",
        version = "0.1.0",
        description = r#"
# Facility Monitor API

Read and operate the live state of a venue's attractions.

## Features

- **Visitor series**: raw and predicted visitor counts per facility over a time window
- **Live dashboard**: every facility joined with its latest queue length and wait time
- **Facility status**: operator-set Normal / Crowded / Breakdown state
- **Working log**: append-only journal of operational events

## Timestamps

`startDate` and `endDate` accept RFC 3339 or `YYYY-MM-DD HH:MM[:SS]`; values without an
offset are read as UTC.

## Error Handling

Failures share one body shape:

```json
{
  "error": "Not Found",
  "message": "Not found: facility 'Log Flume' not found",
  "request_id": "3f0c7b0e-8d4f-4c38-9d2e-4f1c8a1f6b5e",
  "timestamp": "2024-05-01T10:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development")
    ),
    tags(
        (name = "observations", description = "Raw and predicted visitor series"),
        (name = "facilities", description = "Facility reference data and live queue snapshot"),
        (name = "facility-status", description = "Operator-set facility state"),
        (name = "working-log", description = "Operational journal"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::observations::get_raw_data,
        crate::handlers::observations::get_predict_data,

        crate::handlers::facilities::get_fixed_data,
        crate::handlers::facilities::get_facilities,

        crate::handlers::facility_status::list_statuses,
        crate::handlers::facility_status::get_status,
        crate::handlers::facility_status::update_status,

        crate::handlers::logs::list_logs,
        crate::handlers::logs::create_log,

        crate::handlers::health::health_check,
    ),
    components(
        schemas(
            crate::services::observations::Observation,
            crate::services::facilities::FacilitySnapshot,
            crate::handlers::facilities::FacilityResponse,
            crate::handlers::facility_status::FacilityStatusResponse,
            crate::handlers::facility_status::UpdateStatusRequest,
            crate::entities::FacilityStatusKind,
            crate::handlers::logs::LogEntryResponse,
            crate::handlers::logs::CreateLogRequest,
            crate::handlers::health::HealthResponse,
            crate::handlers::health::HealthStatus,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
