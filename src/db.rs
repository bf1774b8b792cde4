use crate::config::AppConfig;
use crate::errors::ServiceError;
use metrics::{counter, gauge, histogram};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Type alias for a database connection pool
pub type DbPool = DatabaseConnection;

/// Configuration for database connection
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// Idle timeout duration
    pub idle_timeout: Duration,
    /// Acquire connection timeout
    pub acquire_timeout: Duration,
    /// Statement timeout
    pub statement_timeout: Option<Duration>,
}

impl From<&AppConfig> for DbConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.database_url.clone(),
            max_connections: cfg.db_max_connections,
            min_connections: cfg.db_min_connections,
            connect_timeout: Duration::from_secs(cfg.db_connect_timeout_secs),
            idle_timeout: Duration::from_secs(cfg.db_idle_timeout_secs),
            acquire_timeout: Duration::from_secs(cfg.db_acquire_timeout_secs),
            statement_timeout: cfg.statement_timeout(),
        }
    }
}

/// Establishes a connection pool to the database with custom configuration
///
/// # Errors
/// Returns `StoreUnavailable` if the connection cannot be established
pub async fn establish_connection_with_config(config: &DbConfig) -> Result<DbPool, ServiceError> {
    debug!("Configuring database connection with: {:?}", config);

    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(false);

    gauge!("facility_monitor_db.max_connections", config.max_connections as f64);

    info!(
        "Connecting to database with max_connections={}",
        config.max_connections
    );

    let db_pool = Database::connect(opt).await.map_err(|e| {
        error!("Database connection establishment failed: {}", e);
        ServiceError::StoreUnavailable(e.to_string())
    })?;

    info!("Database connection pool established successfully");
    Ok(db_pool)
}

/// Establish DB pool using AppConfig tuning
pub async fn establish_connection_from_app_config(cfg: &AppConfig) -> Result<DbPool, ServiceError> {
    let db_cfg: DbConfig = cfg.into();
    establish_connection_with_config(&db_cfg).await
}

/// Shared store handle injected into every service.
///
/// Each call through [`DatabaseAccess::run`] is one store round trip, bounded by
/// the configured statement timeout and recorded in metrics.
#[derive(Debug, Clone)]
pub struct DatabaseAccess {
    pool: Arc<DbPool>,
    statement_timeout: Option<Duration>,
}

impl DatabaseAccess {
    pub fn new(pool: Arc<DbPool>, statement_timeout: Option<Duration>) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }

    /// Get a reference to the connection pool
    pub fn conn(&self) -> &DbPool {
        &self.pool
    }

    /// Awaits a store operation, mapping failures and enforcing the timeout
    pub async fn run<T, Fut>(&self, operation: &str, fut: Fut) -> Result<T, ServiceError>
    where
        Fut: Future<Output = Result<T, DbErr>>,
    {
        let start = Instant::now();
        debug!(operation = %operation, "Starting database operation");

        let outcome = match self.statement_timeout {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result.map_err(ServiceError::db_error),
                Err(_) => Err(ServiceError::Timeout(operation.to_string())),
            },
            None => fut.await.map_err(ServiceError::db_error),
        };

        let elapsed = start.elapsed();
        histogram!("facility_monitor_db.operation.duration", elapsed, "operation" => operation.to_string());

        match &outcome {
            Ok(_) => {
                debug!(operation = %operation, duration = ?elapsed, "Database operation completed")
            }
            Err(e) => {
                error!(operation = %operation, error = %e, "Database operation failed");
                counter!("facility_monitor_db.operation.error", 1, "operation" => operation.to_string());
            }
        }

        outcome
    }
}

/// Runs the embedded schema migrations
pub async fn run_migrations(pool: &DbPool) -> Result<(), ServiceError> {
    info!("Running database migrations");
    let start = Instant::now();

    let result = crate::migrator::Migrator::up(pool, None)
        .await
        .map_err(ServiceError::db_error);

    let elapsed = start.elapsed();
    match &result {
        Ok(_) => info!("Database migrations completed successfully in {:?}", elapsed),
        Err(e) => error!("Database migrations failed after {:?}: {}", elapsed, e),
    }

    result
}

/// Checks if the database connection is active
pub async fn check_connection(pool: &DbPool) -> Result<(), ServiceError> {
    let start = Instant::now();
    let result = pool.ping().await.map_err(|e| {
        counter!("facility_monitor_db.connection_failures", 1);
        ServiceError::StoreUnavailable(e.to_string())
    });

    let elapsed = start.elapsed();
    match &result {
        Ok(_) => gauge!("facility_monitor_db.connection_latency", elapsed.as_millis() as f64),
        Err(e) => error!("Database connection check failed after {:?}: {}", elapsed, e),
    }

    result
}

/// Closes the database connection pool
pub async fn close_pool(pool: DbPool) -> Result<(), ServiceError> {
    info!("Closing database connection pool");
    pool.close().await.map_err(ServiceError::db_error)
}
