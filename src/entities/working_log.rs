use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "working_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Descriptive facility label, not a foreign key
    pub facility: Option<String>,
    pub log_type: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        // Entries are append-only; the timestamp is assigned once, by the server.
        if !insert {
            return Err(DbErr::Custom("working_log entries are immutable".into()));
        }

        let mut active_model = self;
        active_model.timestamp = Set(Utc::now());
        Ok(active_model)
    }
}
