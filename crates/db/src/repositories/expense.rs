//! Expense repository: the expense ledger.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;
use walletify_core::category::CategoryService;
use walletify_core::expense::{
    Expense, ExpenseError as DomainError, ExpenseFilter, ExpenseInput, validate_expense,
    validate_filter,
};
use walletify_shared::types::{CategoryId, ExpenseId, UserId};

use super::category::load_effective;
use crate::entities::expenses;

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Ledger rule violation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Writes a ledger row through any connection, without validation.
pub(crate) async fn insert_expense<C: ConnectionTrait>(
    conn: &C,
    user: UserId,
    input: ExpenseInput,
    future_expense: bool,
) -> Result<expenses::Model, DbErr> {
    expenses::ActiveModel {
        id: Set(Uuid::now_v7()),
        user_id: Set(user.into_inner()),
        category_id: Set(input.category_id.into_inner()),
        name: Set(input.name.trim().to_string()),
        value: Set(input.value),
        date: Set(input.date),
        future_expense: Set(future_expense),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
}

/// Loads a user's expenses dated within `[from, to]`.
pub(crate) async fn expenses_between<C: ConnectionTrait>(
    conn: &C,
    user: UserId,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<Expense>, DbErr> {
    let rows = expenses::Entity::find()
        .filter(expenses::Column::UserId.eq(user.into_inner()))
        .filter(expenses::Column::Date.between(from, to))
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(Expense::from).collect())
}

/// Expense repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an expense as-is.
    ///
    /// `future_expense` marks entries produced by settling a future expense.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn record(
        &self,
        user: UserId,
        input: ExpenseInput,
        future_expense: bool,
    ) -> Result<Expense, DbErr> {
        insert_expense(&self.db, user, input, future_expense)
            .await
            .map(Expense::from)
    }

    /// Creates an expense after checking the ledger rules.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule fails, the category is not visible to the
    /// user, or the database operation fails.
    pub async fn create(
        &self,
        user: UserId,
        input: ExpenseInput,
        today: NaiveDate,
    ) -> Result<Expense, ExpenseError> {
        self.check_input(user, &input, today).await?;
        let expense = self.record(user, input, false).await?;
        tracing::info!(user_id = %user, expense_id = %expense.id, "Expense created");
        Ok(expense)
    }

    /// Lists a user's expenses, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, user: UserId) -> Result<Vec<Expense>, DbErr> {
        let rows = expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user.into_inner()))
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }

    /// Gets one of the user's expenses.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids and `Forbidden` for other users'.
    pub async fn get(&self, user: UserId, id: ExpenseId) -> Result<Expense, ExpenseError> {
        self.find_owned(user, id).await.map(Expense::from)
    }

    /// Replaces the editable fields of an expense.
    ///
    /// The settlement origin flag is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the errors of `get` and `create`.
    pub async fn update(
        &self,
        user: UserId,
        id: ExpenseId,
        input: ExpenseInput,
        today: NaiveDate,
    ) -> Result<Expense, ExpenseError> {
        let model = self.find_owned(user, id).await?;
        self.check_input(user, &input, today).await?;

        let mut active: expenses::ActiveModel = model.into();
        active.category_id = Set(input.category_id.into_inner());
        active.name = Set(input.name.trim().to_string());
        active.value = Set(input.value);
        active.date = Set(input.date);

        let model = active.update(&self.db).await?;
        tracing::info!(user_id = %user, expense_id = %id, "Expense updated");
        Ok(model.into())
    }

    /// Deletes one of the user's expenses.
    ///
    /// # Errors
    ///
    /// Returns the errors of `get`, or a database error.
    pub async fn delete(&self, user: UserId, id: ExpenseId) -> Result<(), ExpenseError> {
        self.find_owned(user, id).await?;
        expenses::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        tracing::info!(user_id = %user, expense_id = %id, "Expense deleted");
        Ok(())
    }

    /// Lists expenses in an inclusive date range, optionally limited to some
    /// categories, newest first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` for an inverted range, or a database error.
    pub async fn filter(
        &self,
        user: UserId,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Expense>, ExpenseError> {
        validate_filter(filter)?;

        let mut query = expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user.into_inner()))
            .filter(expenses::Column::Date.between(filter.from, filter.to));
        if !filter.category_ids.is_empty() {
            query = query.filter(
                expenses::Column::CategoryId
                    .is_in(filter.category_ids.iter().map(|c| c.into_inner())),
            );
        }

        let rows = query
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }

    /// Sums a user's spending in one category over `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn spent_in(
        &self,
        user: UserId,
        category: CategoryId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Decimal, DbErr> {
        let expenses = expenses_between(&self.db, user, from, to).await?;
        Ok(walletify_core::expense::spent_in(&expenses, category, from, to))
    }

    async fn check_input(
        &self,
        user: UserId,
        input: &ExpenseInput,
        today: NaiveDate,
    ) -> Result<(), ExpenseError> {
        validate_expense(input, today)?;
        let effective = load_effective(&self.db, user).await?;
        CategoryService::resolve(&effective, input.category_id)
            .map_err(|_| DomainError::CategoryNotFound(input.category_id))?;
        Ok(())
    }

    async fn find_owned(
        &self,
        user: UserId,
        id: ExpenseId,
    ) -> Result<expenses::Model, ExpenseError> {
        let model = expenses::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound(id))?;
        if model.user_id != user.into_inner() {
            return Err(DomainError::Forbidden.into());
        }
        Ok(model)
    }
}
