pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_buses;
mod m20250601_000002_create_routes;
mod m20250601_000003_create_users;
mod m20250601_000004_create_schedules;
mod m20250601_000005_create_bookings;
mod m20250601_000006_create_payments;
mod m20250601_000007_create_bus_maintenance;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_buses::Migration),
            Box::new(m20250601_000002_create_routes::Migration),
            Box::new(m20250601_000003_create_users::Migration),
            Box::new(m20250601_000004_create_schedules::Migration),
            Box::new(m20250601_000005_create_bookings::Migration),
            Box::new(m20250601_000006_create_payments::Migration),
            Box::new(m20250601_000007_create_bus_maintenance::Migration),
        ]
    }
}
