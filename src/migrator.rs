use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_fixed_data_table::Migration),
            Box::new(m20240301_000002_create_observation_tables::Migration),
            Box::new(m20240301_000003_create_time_wait_data_table::Migration),
            Box::new(m20240301_000004_create_facility_status_table::Migration),
            Box::new(m20240301_000005_create_working_log_table::Migration),
        ]
    }
}

mod m20240301_000001_create_fixed_data_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_fixed_data_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(FixedData::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FixedData::FacilityId)
                                .integer()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FixedData::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(FixedData::MaximumCapacity)
                                .integer()
                                .not_null()
                                .check(Expr::col(FixedData::MaximumCapacity).gt(0)),
                        )
                        .col(ColumnDef::new(FixedData::Runtime).string().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(FixedData::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum FixedData {
        Table,
        FacilityId,
        Name,
        MaximumCapacity,
        Runtime,
    }
}

mod m20240301_000002_create_observation_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_observation_tables"
        }
    }

    fn observation_table<T: IntoIden + Copy + 'static>(table: T) -> TableCreateStatement {
        Table::create()
            .table(table)
            .if_not_exists()
            .col(ColumnDef::new(Observation::Name).string().not_null())
            .col(
                ColumnDef::new(Observation::RecordTime)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Observation::Visitor)
                    .integer()
                    .not_null()
                    .check(Expr::col(Observation::Visitor).gte(0)),
            )
            .primary_key(
                Index::create()
                    .col(Observation::Name)
                    .col(Observation::RecordTime),
            )
            .to_owned()
    }

    fn record_time_index<T: IntoIden + Copy + 'static>(
        name: &str,
        table: T,
    ) -> IndexCreateStatement {
        Index::create()
            .if_not_exists()
            .name(name)
            .table(table)
            .col(Observation::RecordTime)
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager.create_table(observation_table(RawData::Table)).await?;
            manager
                .create_index(record_time_index("idx_raw_data_record_time", RawData::Table))
                .await?;

            manager
                .create_table(observation_table(PredictData::Table))
                .await?;
            manager
                .create_index(record_time_index(
                    "idx_predict_data_record_time",
                    PredictData::Table,
                ))
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PredictData::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(RawData::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden, Clone, Copy)]
    enum RawData {
        Table,
    }

    #[derive(DeriveIden, Clone, Copy)]
    enum PredictData {
        Table,
    }

    #[derive(DeriveIden)]
    enum Observation {
        Name,
        RecordTime,
        Visitor,
    }
}

mod m20240301_000003_create_time_wait_data_table {
    use super::m20240301_000001_create_fixed_data_table::FixedData;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_time_wait_data_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TimeWaitData::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TimeWaitData::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(TimeWaitData::FacilityId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TimeWaitData::CurrentQueue)
                                .integer()
                                .not_null()
                                .check(Expr::col(TimeWaitData::CurrentQueue).gte(0)),
                        )
                        .col(
                            ColumnDef::new(TimeWaitData::WaitTime)
                                .integer()
                                .not_null()
                                .check(Expr::col(TimeWaitData::WaitTime).gte(0)),
                        )
                        .col(
                            ColumnDef::new(TimeWaitData::RecordTime)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_time_wait_data_facility_id")
                                .from(TimeWaitData::Table, TimeWaitData::FacilityId)
                                .to(FixedData::Table, FixedData::FacilityId)
                                .on_delete(ForeignKeyAction::NoAction)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Serves the latest-per-facility ranking
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_time_wait_data_facility_record_time")
                        .table(TimeWaitData::Table)
                        .col(TimeWaitData::FacilityId)
                        .col(TimeWaitData::RecordTime)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TimeWaitData::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum TimeWaitData {
        Table,
        Id,
        FacilityId,
        CurrentQueue,
        WaitTime,
        RecordTime,
    }
}

mod m20240301_000004_create_facility_status_table {
    use super::m20240301_000001_create_fixed_data_table::FixedData;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000004_create_facility_status_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(FacilityStatus::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FacilityStatus::Name)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FacilityStatus::Status)
                                .string_len(16)
                                .not_null()
                                .default("Normal")
                                .check(Expr::col(FacilityStatus::Status).is_in([
                                    "Normal",
                                    "Crowded",
                                    "Breakdown",
                                ])),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_facility_status_name")
                                .from(FacilityStatus::Table, FacilityStatus::Name)
                                .to(FixedData::Table, FixedData::Name)
                                .on_delete(ForeignKeyAction::NoAction)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(FacilityStatus::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum FacilityStatus {
        Table,
        Name,
        Status,
    }
}

mod m20240301_000005_create_working_log_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000005_create_working_log_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(WorkingLog::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WorkingLog::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(WorkingLog::Facility).string().null())
                        .col(ColumnDef::new(WorkingLog::LogType).string().null())
                        .col(ColumnDef::new(WorkingLog::Message).text().null())
                        .col(
                            ColumnDef::new(WorkingLog::Timestamp)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_working_log_timestamp")
                        .table(WorkingLog::Table)
                        .col(WorkingLog::Timestamp)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(WorkingLog::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum WorkingLog {
        Table,
        Id,
        Facility,
        LogType,
        Message,
        Timestamp,
    }
}
