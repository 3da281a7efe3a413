use sea_orm_migration::prelude::*;

mod m20251001_000001_create_help_requests;
mod m20251001_000002_create_volunteers;
mod m20251001_000003_create_relief_supplies;
mod m20251001_000004_create_rescue_operations;
mod m20251001_000005_create_emergency_contacts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_000001_create_help_requests::Migration),
            Box::new(m20251001_000002_create_volunteers::Migration),
            Box::new(m20251001_000003_create_relief_supplies::Migration),
            Box::new(m20251001_000004_create_rescue_operations::Migration),
            Box::new(m20251001_000005_create_emergency_contacts::Migration),
        ]
    }
}
