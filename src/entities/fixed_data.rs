use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Static reference data per facility
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fixed_data")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub facility_id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub maximum_capacity: i32,
    /// Operating hours descriptor, e.g. "09:00-21:00"
    pub runtime: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::time_wait_data::Entity")]
    QueueSamples,
    #[sea_orm(has_one = "super::facility_status::Entity")]
    Status,
}

impl Related<super::time_wait_data::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QueueSamples.def()
    }
}

impl Related<super::facility_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
