//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod budget;
pub mod category;
pub mod expense;
pub mod shared_expense;
pub mod user;

pub use budget::{BudgetError, BudgetRepository};
pub use category::{
    CategoryError, CategoryRepository, DEFAULT_STATIC_CATEGORIES, StaticCategory,
};
pub use expense::{ExpenseError, ExpenseRepository};
pub use shared_expense::{SharedExpenseError, SharedExpenseRepository};
pub use user::UserRepository;

use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction, DbErr,
    IsolationLevel, TransactionTrait,
};

/// Opens a transaction, serializable where the backend supports it.
pub(crate) async fn begin_serializable(
    db: &DatabaseConnection,
) -> Result<DatabaseTransaction, DbErr> {
    let isolation = (db.get_database_backend() == DatabaseBackend::Postgres)
        .then_some(IsolationLevel::Serializable);
    db.begin_with_config(isolation, None).await
}
