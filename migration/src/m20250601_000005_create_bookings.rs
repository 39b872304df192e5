use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20250601_000004_create_schedules::Schedule;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(BookingStatus::Enum)
                    .values([BookingStatus::Pending, BookingStatus::Confirmed, BookingStatus::Cancelled])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(VerificationStatus::Enum)
                    .values([
                        VerificationStatus::Pending,
                        VerificationStatus::Verified,
                        VerificationStatus::NoShow,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(uuid(Booking::ScheduleId).not_null())
                    .col(string_len(Booking::PassengerName, 100).not_null())
                    .col(string_len(Booking::PassengerEmail, 255).not_null())
                    .col(string_len(Booking::PassengerPhone, 30).not_null())
                    .col(string_len(Booking::PickupPoint, 100).not_null())
                    .col(string_len(Booking::Reference, 20).not_null().unique_key())
                    .col(string_len(Booking::TicketCode, 20).not_null().unique_key())
                    .col(string_len(Booking::QrCodeData, 60).not_null())
                    .col(integer(Booking::Seats).not_null())
                    .col(decimal_len(Booking::Amount, 18, 2).not_null())
                    .col(
                        ColumnDef::new(Booking::BookingStatus)
                            .custom(BookingStatus::Enum)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Booking::VerificationStatus)
                            .custom(VerificationStatus::Enum)
                            .not_null(),
                    )
                    .col(boolean(Booking::NotificationSent).not_null().default(false))
                    .col(
                        timestamp_with_time_zone(Booking::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_schedule")
                            .from(Booking::Table, Booking::ScheduleId)
                            .to(Schedule::Table, Schedule::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(VerificationStatus::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(BookingStatus::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    Table,
    Id,
    ScheduleId,
    PassengerName,
    PassengerEmail,
    PassengerPhone,
    PickupPoint,
    Reference,
    TicketCode,
    QrCodeData,
    Seats,
    Amount,
    BookingStatus,
    VerificationStatus,
    NotificationSent,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum BookingStatus {
    #[sea_orm(iden = "booking_status")]
    Enum,
    #[sea_orm(iden = "pending")]
    Pending,
    #[sea_orm(iden = "confirmed")]
    Confirmed,
    #[sea_orm(iden = "cancelled")]
    Cancelled,
}

#[derive(DeriveIden)]
pub enum VerificationStatus {
    #[sea_orm(iden = "verification_status")]
    Enum,
    #[sea_orm(iden = "pending")]
    Pending,
    #[sea_orm(iden = "verified")]
    Verified,
    #[sea_orm(iden = "no_show")]
    NoShow,
}
