//! Shared expense repository.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use uuid::Uuid;
use walletify_core::category::Category;
use walletify_core::expense::ExpenseInput;
use walletify_core::shared_expense::{
    SharedExpense, SharedExpenseEdit, SharedExpenseError as DomainError, SharedExpenseFilter,
    SharedExpenseInput, SharedExpenseService, SharedScope,
};
use walletify_shared::types::{CategoryId, SharedExpenseId, UserId};

use super::category::load_effective;
use super::user::find_by_email;
use crate::entities::shared_expenses;

/// Error types for shared expense operations.
#[derive(Debug, thiserror::Error)]
pub enum SharedExpenseError {
    /// Shared expense rule violation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

fn category_set(categories: &[Category]) -> HashSet<CategoryId> {
    categories.iter().map(|c| c.id).collect()
}

/// Newest date first; same-day rows in creation order.
fn newest_first(query: Select<shared_expenses::Entity>) -> Select<shared_expenses::Entity> {
    query
        .order_by_desc(shared_expenses::Column::Date)
        .order_by_asc(shared_expenses::Column::CreatedAt)
        .order_by_asc(shared_expenses::Column::Id)
}

/// Shared expense repository.
#[derive(Debug, Clone)]
pub struct SharedExpenseRepository {
    db: DatabaseConnection,
}

impl SharedExpenseRepository {
    /// Creates a new shared expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an expense on behalf of the user registered under
    /// `input.share_with`.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound`, `CannotShareWithSelf`, `CategoryNotFound`
    /// unless both users see the category, a ledger rule violation, or a
    /// database error.
    pub async fn create(
        &self,
        owner: UserId,
        input: SharedExpenseInput,
        today: NaiveDate,
    ) -> Result<SharedExpense, SharedExpenseError> {
        let recipient = find_by_email(&self.db, &input.share_with)
            .await?
            .map(|u| UserId::from_uuid(u.id))
            .ok_or_else(|| DomainError::UserNotFound(input.share_with.trim().to_string()))?;
        SharedExpenseService::ensure_counterparty(owner, recipient)?;

        let expense = ExpenseInput::from(&input);
        self.check_input(owner, recipient, &expense, today).await?;

        let model = shared_expenses::ActiveModel {
            id: Set(Uuid::now_v7()),
            owner_id: Set(owner.into_inner()),
            recipient_id: Set(recipient.into_inner()),
            category_id: Set(expense.category_id.into_inner()),
            name: Set(expense.name.trim().to_string()),
            value: Set(expense.value),
            date: Set(expense.date),
            accepted: Set(false),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(
            owner_id = %owner,
            recipient_id = %recipient,
            shared_expense_id = %model.id,
            "Shared expense created"
        );
        Ok(model.into())
    }

    /// Lists the shared expenses `user` recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn created_by(&self, user: UserId) -> Result<Vec<SharedExpense>, DbErr> {
        self.list(
            shared_expenses::Entity::find()
                .filter(shared_expenses::Column::OwnerId.eq(user.into_inner())),
        )
        .await
    }

    /// Lists the shared expenses others recorded for `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn shared_with(&self, user: UserId) -> Result<Vec<SharedExpense>, DbErr> {
        self.list(
            shared_expenses::Entity::find()
                .filter(shared_expenses::Column::RecipientId.eq(user.into_inner())),
        )
        .await
    }

    /// Lists what others recorded for `user` that is not accepted yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn pending(&self, user: UserId) -> Result<Vec<SharedExpense>, DbErr> {
        self.list(
            shared_expenses::Entity::find()
                .filter(shared_expenses::Column::RecipientId.eq(user.into_inner()))
                .filter(shared_expenses::Column::Accepted.eq(false)),
        )
        .await
    }

    /// Lists one side of the user's shares within a date range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` for an inverted range, or a database error.
    pub async fn filter(
        &self,
        user: UserId,
        filter: &SharedExpenseFilter,
    ) -> Result<Vec<SharedExpense>, SharedExpenseError> {
        SharedExpenseService::validate_filter(filter)?;

        let side = match filter.scope {
            SharedScope::Mine => shared_expenses::Column::OwnerId,
            SharedScope::SharedWithMe => shared_expenses::Column::RecipientId,
        };
        let mut query = shared_expenses::Entity::find()
            .filter(side.eq(user.into_inner()))
            .filter(shared_expenses::Column::Date.between(filter.from, filter.to));
        if let Some(category) = filter.category_id {
            query = query.filter(shared_expenses::Column::CategoryId.eq(category.into_inner()));
        }

        Ok(self.list(query).await?)
    }

    /// Gets a shared expense the user is party to.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids and `Forbidden` for third parties.
    pub async fn get(
        &self,
        user: UserId,
        id: SharedExpenseId,
    ) -> Result<SharedExpense, SharedExpenseError> {
        let (_, expense) = self.find(id).await?;
        SharedExpenseService::ensure_party(&expense, user)?;
        Ok(expense)
    }

    /// Replaces the editable fields; recipient only.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden` for anyone but the recipient, plus the
    /// validation errors of `create`.
    pub async fn update(
        &self,
        user: UserId,
        id: SharedExpenseId,
        edit: SharedExpenseEdit,
        today: NaiveDate,
    ) -> Result<SharedExpense, SharedExpenseError> {
        let (model, expense) = self.find(id).await?;
        SharedExpenseService::ensure_recipient(&expense, user)?;

        let input = ExpenseInput::from(&edit);
        self.check_input(expense.owner_id, expense.recipient_id, &input, today)
            .await?;

        let mut active: shared_expenses::ActiveModel = model.into();
        active.category_id = Set(input.category_id.into_inner());
        active.name = Set(input.name.trim().to_string());
        active.value = Set(input.value);
        active.date = Set(input.date);

        let model = active.update(&self.db).await?;
        tracing::info!(user_id = %user, shared_expense_id = %id, "Shared expense updated");
        Ok(model.into())
    }

    /// Marks a shared expense as accepted; recipient only.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden`, or `AlreadyAccepted`.
    pub async fn accept(
        &self,
        user: UserId,
        id: SharedExpenseId,
    ) -> Result<SharedExpense, SharedExpenseError> {
        let (model, expense) = self.find(id).await?;
        SharedExpenseService::ensure_recipient(&expense, user)?;
        if expense.accepted {
            return Err(DomainError::AlreadyAccepted(id).into());
        }

        let mut active: shared_expenses::ActiveModel = model.into();
        active.accepted = Set(true);
        let model = active.update(&self.db).await?;

        tracing::info!(user_id = %user, shared_expense_id = %id, "Shared expense accepted");
        Ok(model.into())
    }

    /// Deletes a shared expense; recipient only.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`, or a database error.
    pub async fn delete(&self, user: UserId, id: SharedExpenseId) -> Result<(), SharedExpenseError> {
        let (_, expense) = self.find(id).await?;
        SharedExpenseService::ensure_recipient(&expense, user)?;

        shared_expenses::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        tracing::info!(user_id = %user, shared_expense_id = %id, "Shared expense deleted");
        Ok(())
    }

    async fn list(
        &self,
        query: Select<shared_expenses::Entity>,
    ) -> Result<Vec<SharedExpense>, DbErr> {
        let rows = newest_first(query).all(&self.db).await?;
        Ok(rows.into_iter().map(SharedExpense::from).collect())
    }

    async fn check_input(
        &self,
        owner: UserId,
        recipient: UserId,
        input: &ExpenseInput,
        today: NaiveDate,
    ) -> Result<(), SharedExpenseError> {
        let owner_categories = category_set(&load_effective(&self.db, owner).await?);
        let recipient_categories = category_set(&load_effective(&self.db, recipient).await?);
        SharedExpenseService::validate(input, &owner_categories, &recipient_categories, today)?;
        Ok(())
    }

    async fn find(
        &self,
        id: SharedExpenseId,
    ) -> Result<(shared_expenses::Model, SharedExpense), SharedExpenseError> {
        let model = shared_expenses::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound(id))?;
        let expense = SharedExpense::from(model.clone());
        Ok((model, expense))
    }
}
