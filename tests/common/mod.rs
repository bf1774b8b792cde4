#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde_json::Value;
use tower::ServiceExt;

use facility_monitor_api::{
    config::AppConfig,
    db,
    entities::{
        facility_status, fixed_data, predict_data, raw_data, time_wait_data, working_log,
        FacilityStatusKind,
    },
    logging::discard_logger,
    services::observations::Series,
    AppState,
};

/// Application router backed by a private in-memory SQLite store.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Same as [`TestApp::new`] with a hook to adjust configuration first.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // One connection keeps every statement on the same in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.db_idle_timeout_secs = 3600;
        cfg.static_dir = String::new();
        adjust(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg, &discard_logger());
        let router = facility_monitor_api::app_router(state.clone());

        Self { router, state }
    }

    pub fn conn(&self) -> &DatabaseConnection {
        &self.state.db
    }

    /// Send a request against the router, encoding `body` as JSON when present.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let response = self.request(Method::GET, uri, None).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = self.request(Method::POST, uri, Some(body)).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    /// Registers a facility together with a `Normal` status row.
    pub async fn seed_facility(&self, facility_id: i32, name: &str) -> fixed_data::Model {
        let facility = self.seed_facility_without_status(facility_id, name).await;
        facility_status::ActiveModel {
            name: Set(name.to_string()),
            status: Set(FacilityStatusKind::Normal),
        }
        .insert(self.conn())
        .await
        .expect("seed facility status");
        facility
    }

    pub async fn seed_facility_without_status(
        &self,
        facility_id: i32,
        name: &str,
    ) -> fixed_data::Model {
        fixed_data::ActiveModel {
            facility_id: Set(facility_id),
            name: Set(name.to_string()),
            maximum_capacity: Set(20),
            runtime: Set("09:00-21:00".to_string()),
        }
        .insert(self.conn())
        .await
        .expect("seed facility")
    }

    pub async fn seed_observation(
        &self,
        series: Series,
        name: &str,
        record_time: DateTime<Utc>,
        visitor: i32,
    ) {
        match series {
            Series::Raw => {
                raw_data::ActiveModel {
                    name: Set(name.to_string()),
                    record_time: Set(record_time),
                    visitor: Set(visitor),
                }
                .insert(self.conn())
                .await
                .expect("seed raw observation");
            }
            Series::Predicted => {
                predict_data::ActiveModel {
                    name: Set(name.to_string()),
                    record_time: Set(record_time),
                    visitor: Set(visitor),
                }
                .insert(self.conn())
                .await
                .expect("seed predicted observation");
            }
        }
    }

    pub async fn seed_queue_sample(
        &self,
        facility_id: i32,
        current_queue: i32,
        wait_time: i32,
        record_time: DateTime<Utc>,
    ) -> time_wait_data::Model {
        time_wait_data::ActiveModel {
            facility_id: Set(facility_id),
            current_queue: Set(current_queue),
            wait_time: Set(wait_time),
            record_time: Set(record_time),
            ..Default::default()
        }
        .insert(self.conn())
        .await
        .expect("seed queue sample")
    }

    /// Inserts a log row with an explicit timestamp, bypassing the server clock.
    pub async fn seed_log_entry(&self, message: &str, timestamp: DateTime<Utc>) -> i64 {
        working_log::Entity::insert(working_log::ActiveModel {
            message: Set(Some(message.to_string())),
            timestamp: Set(timestamp),
            ..Default::default()
        })
        .exec(self.conn())
        .await
        .expect("seed log entry")
        .last_insert_id
    }
}

pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is not json")
    }
}

/// Parses an RFC 3339 literal used in fixtures.
pub fn ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("fixture timestamp")
        .with_timezone(&Utc)
}

/// Reads a `record_time`-style JSON string back into a timestamp.
pub fn json_ts(value: &Value) -> DateTime<Utc> {
    ts(value.as_str().expect("timestamp string"))
}
