//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration.

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_initial;
mod m20240101_000002_budget_constraints;
mod m20240101_000003_shared_expenses;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_initial::Migration),
            Box::new(m20240101_000002_budget_constraints::Migration),
            Box::new(m20240101_000003_shared_expenses::Migration),
        ]
    }
}
