use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Route::Table)
                    .if_not_exists()
                    .col(uuid(Route::Id).primary_key())
                    .col(string_len(Route::Name, 100).not_null())
                    .col(string_len(Route::StartLocation, 100).not_null())
                    .col(string_len(Route::EndLocation, 100).not_null())
                    .col(json_binary(Route::PickupPoints).not_null())
                    .col(decimal_len(Route::Price, 18, 2).not_null())
                    .col(
                        timestamp_with_time_zone(Route::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Route::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Route {
    Table,
    Id,
    Name,
    StartLocation,
    EndLocation,
    PickupPoints,
    Price,
    CreatedAt,
}
