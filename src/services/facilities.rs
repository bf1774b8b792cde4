use crate::{
    db::DatabaseAccess, entities::fixed_data, errors::ServiceError,
    services::queue::RANKED_QUEUE_SAMPLES,
};
use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, EntityTrait, FromQueryResult, QueryOrder, Statement};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

/// A facility joined with its most recent queue sample.
///
/// The queue fields are all `None` when the facility has never been sampled.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, Deserialize, ToSchema)]
pub struct FacilitySnapshot {
    pub facility_id: i32,
    pub name: String,
    pub maximum_capacity: i32,
    pub runtime: String,
    pub current_queue: Option<i32>,
    /// Minutes
    pub wait_time: Option<i32>,
    pub record_time: Option<DateTime<Utc>>,
}

/// Static facility reference data plus the live dashboard join
#[derive(Clone)]
pub struct FacilityRegistryService {
    db: DatabaseAccess,
}

impl FacilityRegistryService {
    pub fn new(db: DatabaseAccess) -> Self {
        Self { db }
    }

    /// Every facility, ordered by id
    #[instrument(skip(self))]
    pub async fn list_facilities(&self) -> Result<Vec<fixed_data::Model>, ServiceError> {
        let conn = self.db.conn();
        self.db
            .run(
                "list_facilities",
                fixed_data::Entity::find()
                    .order_by_asc(fixed_data::Column::FacilityId)
                    .all(conn),
            )
            .await
    }

    /// Up to `limit` facilities with their latest queue sample, most recently
    /// sampled first. Facilities without samples come last, by id.
    ///
    /// Runs as one statement so every row reflects the same store state.
    #[instrument(skip(self))]
    pub async fn list_facilities_with_latest_queue(
        &self,
        limit: u64,
    ) -> Result<Vec<FacilitySnapshot>, ServiceError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let conn = self.db.conn();
        let stmt = Statement::from_string(conn.get_database_backend(), snapshot_sql(limit));

        self.db
            .run(
                "list_facilities_with_latest_queue",
                FacilitySnapshot::find_by_statement(stmt).all(conn),
            )
            .await
    }
}

// Unsampled facilities sort last on every backend; Postgres alone would put
// NULL record times first under a plain DESC.
fn snapshot_sql(limit: u64) -> String {
    format!(
        "SELECT f.facility_id, f.name, f.maximum_capacity, f.runtime, \
                t.current_queue, t.wait_time, t.record_time \
         FROM fixed_data f \
         LEFT JOIN ({ranked}) t ON t.facility_id = f.facility_id AND t.rn = 1 \
         ORDER BY CASE WHEN t.record_time IS NULL THEN 1 ELSE 0 END, \
                  t.record_time DESC, f.facility_id \
         LIMIT {limit}",
        ranked = RANKED_QUEUE_SAMPLES,
        limit = limit
    )
}
