//! Facility Monitor API Library
//!
//! Visitor series, live queue snapshots, operator-set facility status and the
//! working log of a venue, served over HTTP.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    /// Wires every service onto one shared pool
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        logger: &slog::Logger,
    ) -> Self {
        let access = db::DatabaseAccess::new(db.clone(), config.statement_timeout());
        let services = handlers::AppServices::new(access, logger);
        Self {
            db,
            config,
            services,
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<T>, errors::ServiceError>;

/// Routes mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    let observations = Router::new()
        .route("/raw-data", get(handlers::observations::get_raw_data))
        .route("/predict-data", get(handlers::observations::get_predict_data));

    let facilities = Router::new()
        .route("/fixed-data", get(handlers::facilities::get_fixed_data))
        .route("/facilities", get(handlers::facilities::get_facilities));

    let facility_status = Router::new()
        .route(
            "/facility-status",
            get(handlers::facility_status::list_statuses),
        )
        .route(
            "/facility-status/:facility",
            get(handlers::facility_status::get_status)
                .post(handlers::facility_status::update_status),
        );

    let working_log = Router::new().route(
        "/logs",
        get(handlers::logs::list_logs).post(handlers::logs::create_log),
    );

    Router::new()
        .merge(observations)
        .merge(facilities)
        .merge(facility_status)
        .merge(working_log)
}

/// API, health and docs routes with request correlation applied.
///
/// Transport concerns (CORS, compression, timeouts, static files) are layered on by the binary.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api", api_routes())
        .merge(openapi::swagger_ui())
        .layer(crate::tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}
