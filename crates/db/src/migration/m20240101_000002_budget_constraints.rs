//! Database-level guards for budgets on PostgreSQL.
//!
//! The exclusion constraint closes the race between two concurrent budget
//! creations that both pass the overlap check. SQLite has no equivalent, so
//! this migration is a no-op there.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() != DatabaseBackend::Postgres {
            return Ok(());
        }
        manager
            .get_connection()
            .execute_unprepared(CONSTRAINTS_SQL)
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() != DatabaseBackend::Postgres {
            return Ok(());
        }
        manager
            .get_connection()
            .execute_unprepared(DROP_CONSTRAINTS_SQL)
            .await?;
        Ok(())
    }
}

const CONSTRAINTS_SQL: &str = r"
CREATE EXTENSION IF NOT EXISTS btree_gist;

-- Closed date windows; a single day is allowed
ALTER TABLE budgets
    ADD CONSTRAINT chk_budgets_range CHECK (initial_date <= final_date);

-- No two budgets of one user may share a day
ALTER TABLE budgets
    ADD CONSTRAINT excl_budgets_user_overlap EXCLUDE USING gist (
        user_id WITH =,
        daterange(initial_date, final_date, '[]') WITH &&
    );

ALTER TABLE budget_details
    ADD CONSTRAINT chk_budget_details_kind CHECK (kind IN ('limit', 'future_expense')),
    ADD CONSTRAINT chk_budget_details_value CHECK (value > 0),
    ADD CONSTRAINT chk_budget_details_future_fields CHECK (
        kind = 'limit' OR (name IS NOT NULL AND expiration_date IS NOT NULL)
    );

ALTER TABLE expenses
    ADD CONSTRAINT chk_expenses_value CHECK (value > 0);
";

const DROP_CONSTRAINTS_SQL: &str = r"
ALTER TABLE expenses DROP CONSTRAINT IF EXISTS chk_expenses_value;
ALTER TABLE budget_details
    DROP CONSTRAINT IF EXISTS chk_budget_details_future_fields,
    DROP CONSTRAINT IF EXISTS chk_budget_details_value,
    DROP CONSTRAINT IF EXISTS chk_budget_details_kind;
ALTER TABLE budgets DROP CONSTRAINT IF EXISTS excl_budgets_user_overlap;
ALTER TABLE budgets DROP CONSTRAINT IF EXISTS chk_budgets_range;
";
