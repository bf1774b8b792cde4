use crate::{db::DatabaseAccess, entities::working_log, errors::ServiceError};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use slog::Logger;
use tracing::{info, instrument};

/// Fields a caller supplies for a new entry; id and timestamp are assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewLogEntry {
    pub facility: Option<String>,
    pub log_type: Option<String>,
    pub message: Option<String>,
}

/// One page of the log, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogPage {
    pub limit: u64,
    /// Continue after this entry: only entries listed behind it in
    /// `(timestamp, id)` order are returned
    pub before_id: Option<i64>,
}

/// Append-only operator journal
#[derive(Clone)]
pub struct WorkingLogService {
    db: DatabaseAccess,
    logger: Logger,
}

impl WorkingLogService {
    pub fn new(db: DatabaseAccess, logger: Logger) -> Self {
        Self { db, logger }
    }

    /// Lists entries ordered by timestamp descending, ties broken by id descending.
    ///
    /// Ids and timestamps of concurrent appends may disagree, so the cursor
    /// compares the full `(timestamp, id)` key of the anchor entry.
    #[instrument(skip(self))]
    pub async fn list_logs(&self, page: LogPage) -> Result<Vec<working_log::Model>, ServiceError> {
        let conn = self.db.conn();

        let mut query = working_log::Entity::find()
            .order_by_desc(working_log::Column::Timestamp)
            .order_by_desc(working_log::Column::Id)
            .limit(page.limit);
        if let Some(before_id) = page.before_id {
            let anchor = self
                .db
                .run(
                    "find_working_log_cursor",
                    working_log::Entity::find_by_id(before_id).one(conn),
                )
                .await?
                .ok_or_else(|| {
                    ServiceError::InvalidArgument(format!("unknown log cursor {}", before_id))
                })?;

            query = query.filter(
                Condition::any()
                    .add(working_log::Column::Timestamp.lt(anchor.timestamp))
                    .add(
                        Condition::all()
                            .add(working_log::Column::Timestamp.eq(anchor.timestamp))
                            .add(working_log::Column::Id.lt(anchor.id)),
                    ),
            );
        }

        self.db.run("list_working_log", query.all(conn)).await
    }

    /// Persists a new entry and returns it with its assigned id and timestamp
    #[instrument(skip(self, entry))]
    pub async fn append_log(
        &self,
        entry: NewLogEntry,
    ) -> Result<working_log::Model, ServiceError> {
        let conn = self.db.conn();
        let model = working_log::ActiveModel {
            facility: Set(entry.facility),
            log_type: Set(entry.log_type),
            message: Set(entry.message),
            ..Default::default()
        };

        let saved = self.db.run("append_working_log", model.insert(conn)).await?;

        info!(log_id = saved.id, "Working log entry appended");
        slog::info!(self.logger, "working log appended";
            "id" => saved.id,
            "facility" => saved.facility.as_deref().unwrap_or("-"),
            "log_type" => saved.log_type.as_deref().unwrap_or("-"),
        );

        Ok(saved)
    }
}
