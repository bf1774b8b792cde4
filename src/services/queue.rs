use crate::{db::DatabaseAccess, entities::time_wait_data, errors::ServiceError};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Statement,
};
use tracing::instrument;

/// Ranks every queue sample within its facility, newest first (`rn = 1` is the latest).
pub(crate) const RANKED_QUEUE_SAMPLES: &str = "SELECT id, facility_id, current_queue, wait_time, record_time, \
     ROW_NUMBER() OVER (PARTITION BY facility_id ORDER BY record_time DESC, id DESC) AS rn \
     FROM time_wait_data";

/// Read side of the queue and wait-time samples
#[derive(Clone)]
pub struct QueueTracker {
    db: DatabaseAccess,
}

impl QueueTracker {
    pub fn new(db: DatabaseAccess) -> Self {
        Self { db }
    }

    /// Most recent sample for one facility, if it has any
    #[instrument(skip(self))]
    pub async fn latest_sample(
        &self,
        facility_id: i32,
    ) -> Result<Option<time_wait_data::Model>, ServiceError> {
        let conn = self.db.conn();
        self.db
            .run(
                "latest_queue_sample",
                time_wait_data::Entity::find()
                    .filter(time_wait_data::Column::FacilityId.eq(facility_id))
                    .order_by_desc(time_wait_data::Column::RecordTime)
                    .order_by_desc(time_wait_data::Column::Id)
                    .one(conn),
            )
            .await
    }

    /// Most recent sample of every facility that has at least one, ordered by facility id
    #[instrument(skip(self))]
    pub async fn latest_samples(&self) -> Result<Vec<time_wait_data::Model>, ServiceError> {
        let conn = self.db.conn();
        let sql = format!(
            "SELECT id, facility_id, current_queue, wait_time, record_time \
             FROM ({}) ranked WHERE rn = 1 ORDER BY facility_id",
            RANKED_QUEUE_SAMPLES
        );
        let stmt = Statement::from_string(conn.get_database_backend(), sql);

        self.db
            .run(
                "latest_queue_samples",
                time_wait_data::Entity::find().from_raw_sql(stmt).all(conn),
            )
            .await
    }
}
