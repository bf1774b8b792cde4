use crate::{
    db::DatabaseAccess,
    entities::{facility_status, FacilityStatusKind},
    errors::ServiceError,
};
use sea_orm::{sea_query::Expr, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use slog::Logger;
use std::str::FromStr;
use tracing::{info, instrument};

/// Parses an operator-supplied status; matching is exact and case-sensitive.
pub fn parse_status(raw: &str) -> Result<FacilityStatusKind, ServiceError> {
    FacilityStatusKind::from_str(raw).map_err(|_| {
        ServiceError::InvalidArgument(format!(
            "invalid status '{}', expected one of Normal, Crowded, Breakdown",
            raw
        ))
    })
}

/// Reads and overwrites the operational state of facilities
#[derive(Clone)]
pub struct FacilityStatusService {
    db: DatabaseAccess,
    logger: Logger,
}

impl FacilityStatusService {
    pub fn new(db: DatabaseAccess, logger: Logger) -> Self {
        Self { db, logger }
    }

    #[instrument(skip(self))]
    pub async fn get_status(&self, name: &str) -> Result<facility_status::Model, ServiceError> {
        let conn = self.db.conn();
        self.db
            .run(
                "get_facility_status",
                facility_status::Entity::find_by_id(name.to_string()).one(conn),
            )
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("facility '{}' not found", name)))
    }

    #[instrument(skip(self))]
    pub async fn get_all_statuses(&self) -> Result<Vec<facility_status::Model>, ServiceError> {
        let conn = self.db.conn();
        self.db
            .run(
                "list_facility_statuses",
                facility_status::Entity::find()
                    .order_by_asc(facility_status::Column::Name)
                    .all(conn),
            )
            .await
    }

    /// Overwrites the status of an existing record and returns it as stored.
    ///
    /// Never creates a record; an unknown name is `NotFound`.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        name: &str,
        status: FacilityStatusKind,
    ) -> Result<facility_status::Model, ServiceError> {
        let conn = self.db.conn();
        let updated = self
            .db
            .run(
                "set_facility_status",
                facility_status::Entity::update_many()
                    .col_expr(facility_status::Column::Status, Expr::value(status))
                    .filter(facility_status::Column::Name.eq(name))
                    .exec_with_returning(conn),
            )
            .await?;

        let record = updated
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::NotFound(format!("facility '{}' not found", name)))?;

        info!(facility = %record.name, status = %record.status, "Facility status updated");
        slog::info!(self.logger, "facility status changed";
            "facility" => &record.name,
            "status" => record.status.to_string(),
        );

        Ok(record)
    }
}
