use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20250601_000001_create_buses::Bus;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(MaintenanceStatus::Enum)
                    .values([
                        MaintenanceStatus::Scheduled,
                        MaintenanceStatus::InProgress,
                        MaintenanceStatus::Completed,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BusMaintenance::Table)
                    .if_not_exists()
                    .col(uuid(BusMaintenance::Id).primary_key())
                    .col(uuid(BusMaintenance::BusId).not_null())
                    .col(date(BusMaintenance::MaintenanceDate).not_null())
                    .col(text(BusMaintenance::Description).not_null())
                    .col(decimal_len(BusMaintenance::Cost, 18, 2).not_null())
                    .col(
                        ColumnDef::new(BusMaintenance::Status)
                            .custom(MaintenanceStatus::Enum)
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(BusMaintenance::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenance_bus")
                            .from(BusMaintenance::Table, BusMaintenance::BusId)
                            .to(Bus::Table, Bus::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BusMaintenance::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(MaintenanceStatus::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum BusMaintenance {
    Table,
    Id,
    BusId,
    MaintenanceDate,
    Description,
    Cost,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum MaintenanceStatus {
    #[sea_orm(iden = "maintenance_status")]
    Enum,
    #[sea_orm(iden = "scheduled")]
    Scheduled,
    #[sea_orm(iden = "in_progress")]
    InProgress,
    #[sea_orm(iden = "completed")]
    Completed,
}
