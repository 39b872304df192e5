use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20250601_000001_create_buses::Bus;
use super::m20250601_000002_create_routes::Route;
use super::m20250601_000003_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(ScheduleStatus::Enum)
                    .values([
                        ScheduleStatus::Scheduled,
                        ScheduleStatus::InProgress,
                        ScheduleStatus::Completed,
                        ScheduleStatus::Cancelled,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Schedule::Table)
                    .if_not_exists()
                    .col(uuid(Schedule::Id).primary_key())
                    .col(uuid(Schedule::RouteId).not_null())
                    .col(uuid(Schedule::BusId).not_null())
                    .col(uuid(Schedule::DriverId).not_null())
                    .col(time(Schedule::DepartureTime).not_null())
                    .col(date(Schedule::TripDate).not_null())
                    // Snapshot of the route price at creation/update time
                    .col(decimal_len(Schedule::Price, 18, 2).not_null())
                    .col(
                        ColumnDef::new(Schedule::Status)
                            .custom(ScheduleStatus::Enum)
                            .not_null(),
                    )
                    .col(timestamp_with_time_zone_null(Schedule::ActualDepartureTime))
                    .col(timestamp_with_time_zone_null(Schedule::ActualArrivalTime))
                    .col(
                        timestamp_with_time_zone(Schedule::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_route")
                            .from(Schedule::Table, Schedule::RouteId)
                            .to(Route::Table, Route::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_bus")
                            .from(Schedule::Table, Schedule::BusId)
                            .to(Bus::Table, Bus::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_driver")
                            .from(Schedule::Table, Schedule::DriverId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Schedule::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(ScheduleStatus::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Schedule {
    Table,
    Id,
    RouteId,
    BusId,
    DriverId,
    DepartureTime,
    TripDate,
    Price,
    Status,
    ActualDepartureTime,
    ActualArrivalTime,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum ScheduleStatus {
    #[sea_orm(iden = "schedule_status")]
    Enum,
    #[sea_orm(iden = "scheduled")]
    Scheduled,
    #[sea_orm(iden = "in_progress")]
    InProgress,
    #[sea_orm(iden = "completed")]
    Completed,
    #[sea_orm(iden = "cancelled")]
    Cancelled,
}
