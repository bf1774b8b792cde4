use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError, ValidationErrors};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 3000;
const CONFIG_DIR: &str = "config";
const DEFAULT_DATABASE_URL: &str = "postgres://postgres@localhost:5432/mdap";
const DEFAULT_DASHBOARD_LIMIT: u64 = 9;
const DEFAULT_LOG_PAGE: u64 = 500;
const DEFAULT_LOG_PAGE_MAX: u64 = 5000;

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// Server host address
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// CORS: comma-separated list of allowed origins (production)
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Allow permissive CORS fallback
    #[serde(default)]
    pub cors_allow_any_origin: bool,

    /// CORS: allow credentials
    #[serde(default)]
    pub cors_allow_credentials: bool,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// DB timeouts (seconds)
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "default_db_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,
    #[serde(default = "default_db_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,
    /// Upper bound for a single store round trip (seconds), 0 = unbounded
    #[serde(default = "default_db_statement_timeout_secs")]
    pub db_statement_timeout_secs: u64,

    /// Number of rows returned by the live dashboard snapshot
    #[serde(default = "default_dashboard_limit")]
    #[validate(range(min = 1))]
    pub dashboard_limit: u64,

    /// Working log page size when the caller does not pass `limit`
    #[serde(default = "default_log_page")]
    #[validate(range(min = 1))]
    pub log_page_default: u64,

    /// Largest working log page a caller may request
    #[serde(default = "default_log_page_max")]
    #[validate(range(min = 1))]
    pub log_page_max: u64,

    /// Directory served for non-API paths; empty disables static serving
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl AppConfig {
    /// Creates a configuration with defaults for everything but the essentials
    pub fn new(database_url: String, host: String, port: u16, environment: String) -> Self {
        Self {
            database_url,
            host,
            port,
            environment,
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: false,
            cors_allowed_origins: None,
            cors_allow_any_origin: false,
            cors_allow_credentials: false,
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            db_connect_timeout_secs: default_db_connect_timeout_secs(),
            db_idle_timeout_secs: default_db_idle_timeout_secs(),
            db_acquire_timeout_secs: default_db_acquire_timeout_secs(),
            db_statement_timeout_secs: default_db_statement_timeout_secs(),
            dashboard_limit: default_dashboard_limit(),
            log_page_default: default_log_page(),
            log_page_max: default_log_page_max(),
            static_dir: default_static_dir(),
        }
    }

    /// Checks if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Returns true if explicit CORS origins are configured
    pub fn has_cors_allowed_origins(&self) -> bool {
        self.cors_allowed_origins
            .as_ref()
            .map(|raw| raw.split(',').any(|origin| !origin.trim().is_empty()))
            .unwrap_or(false)
    }

    /// Whether we should fall back to permissive CORS
    pub fn should_allow_permissive_cors(&self) -> bool {
        self.is_development() || self.cors_allow_any_origin
    }

    /// Gets log level reference
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn statement_timeout(&self) -> Option<Duration> {
        (self.db_statement_timeout_secs > 0)
            .then(|| Duration::from_secs(self.db_statement_timeout_secs))
    }

    fn validate_additional_constraints(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !self.should_allow_permissive_cors() && !self.has_cors_allowed_origins() {
            let mut err = ValidationError::new("cors_allowed_origins_required");
            err.message = Some(
                "Set APP__CORS_ALLOWED_ORIGINS for non-development environments or explicitly opt-in via APP__CORS_ALLOW_ANY_ORIGIN=true".into(),
            );
            errors.add("cors_allowed_origins", err);
        }

        if self.log_page_default > self.log_page_max {
            let mut err = ValidationError::new("log_page_default");
            err.message = Some("log_page_default must not exceed log_page_max".into());
            errors.add("log_page_default", err);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Default value functions
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_db_max_connections() -> u32 {
    16
}
fn default_db_min_connections() -> u32 {
    2
}
fn default_db_connect_timeout_secs() -> u64 {
    30
}
fn default_db_idle_timeout_secs() -> u64 {
    600
}
fn default_db_acquire_timeout_secs() -> u64 {
    8
}
fn default_db_statement_timeout_secs() -> u64 {
    30
}

fn default_dashboard_limit() -> u64 {
    DEFAULT_DASHBOARD_LIMIT
}

fn default_log_page() -> u64 {
    DEFAULT_LOG_PAGE
}

fn default_log_page_max() -> u64 {
    DEFAULT_LOG_PAGE_MAX
}

fn default_static_dir() -> String {
    "public".to_string()
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `level` when set.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| format!("facility_monitor_api={},tower_http=debug", level));

    let (tracer, otlp_error) = match otlp_tracer() {
        Some(Ok(tracer)) => (Some(tracer), None),
        Some(Err(err)) => (None, Some(err)),
        None => (None, None),
    };

    let registry = tracing_subscriber::registry()
        .with(tracer.map(|t| tracing_opentelemetry::layer().with_tracer(t)))
        .with(EnvFilter::new(filter));
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };

    if let Some(err) = otlp_error {
        error!("OTLP span export disabled: {}", err);
    }
}

/// OTLP pipeline, only when `APP__OTEL_ENABLED` or `OTEL_EXPORTER_OTLP_ENDPOINT` asks for it.
fn otlp_tracer(
) -> Option<Result<opentelemetry_sdk::trace::Tracer, opentelemetry::trace::TraceError>> {
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::{trace as sdktrace, Resource};

    let endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();
    let enabled = env::var("APP__OTEL_ENABLED")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if !enabled && endpoint.is_none() {
        return None;
    }

    let service_name =
        env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "facility-monitor-api".to_string());
    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint.unwrap_or_else(|| "http://localhost:4317".to_string()));

    Some(
        opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(exporter)
            .with_trace_config(
                sdktrace::config()
                    .with_resource(Resource::new(vec![KeyValue::new("service.name", service_name)])),
            )
            .install_batch(opentelemetry_sdk::runtime::Tokio),
    )
}

/// Loads and validates configuration.
///
/// Later sources win: built-in defaults, `config/default.toml`,
/// `config/{RUN_ENV}.toml`, `APP__*` variables, then a bare `PORT`.
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let profile = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!(profile = %profile, "loading configuration");

    let mut builder = Config::builder()
        .set_default("database_url", DEFAULT_DATABASE_URL)?
        .set_default("host", "0.0.0.0")?
        .set_default("port", DEFAULT_PORT as i64)?
        .set_default("environment", DEFAULT_ENV)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, profile)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"));

    if let Some(port) = env::var("PORT").ok().filter(|p| !p.trim().is_empty()) {
        builder = builder.set_override("port", port)?;
    }

    let app_config: AppConfig = builder.build()?.try_deserialize()?;
    app_config
        .validate()
        .and_then(|_| app_config.validate_additional_constraints())
        .map_err(|e| {
            error!("invalid configuration: {}", e);
            AppConfigError::Validation(e)
        })?;

    Ok(app_config)
}
