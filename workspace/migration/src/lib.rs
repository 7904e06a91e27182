pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_job_board;
mod m20240101_000002_create_registries;
mod m20240101_000003_create_sessions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_job_board::Migration),
            Box::new(m20240101_000002_create_registries::Migration),
            Box::new(m20240101_000003_create_sessions::Migration),
        ]
    }
}
