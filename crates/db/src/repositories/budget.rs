//! Budget repository: the budget engine's persistence side.
//!
//! Every mutation runs in one transaction. A failing rule returns early and
//! the dropped transaction rolls back, so a rejected create or update never
//! leaves rows behind.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;
use walletify_core::budget::{
    Budget, BudgetError as DomainError, BudgetInput, BudgetPeriod, BudgetService, BudgetView,
    Detail, DetailKind, DetailValidator, FutureExpenseDetail, NewDetail, ReminderGroup,
    due_details,
};
use walletify_core::category::Category;
use walletify_core::expense::Expense;
use walletify_shared::types::{BudgetId, CategoryId, DetailId, UserId};

use super::begin_serializable;
use super::category::load_effective;
use super::expense::{expenses_between, insert_expense};
use crate::entities::{budget_details, budgets, users};

/// Error types for budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// Budget rule violation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Loads a user's budgets in creation order.
async fn load_budgets<C: ConnectionTrait>(
    conn: &C,
    user: UserId,
) -> Result<Vec<Budget>, DbErr> {
    let rows = budgets::Entity::find()
        .filter(budgets::Column::UserId.eq(user.into_inner()))
        .order_by_asc(budgets::Column::CreatedAt)
        .order_by_asc(budgets::Column::Id)
        .all(conn)
        .await?;
    rows.into_iter().map(budgets::Model::into_budget).collect()
}

/// Loads the details of one budget in creation order.
async fn load_details<C: ConnectionTrait>(
    conn: &C,
    budget_id: BudgetId,
) -> Result<Vec<Detail>, DbErr> {
    budget_details::Entity::find()
        .filter(budget_details::Column::BudgetId.eq(budget_id.into_inner()))
        .order_by_asc(budget_details::Column::CreatedAt)
        .order_by_asc(budget_details::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(budget_details::Model::into_detail)
        .collect()
}

async fn insert_details<C: ConnectionTrait>(
    conn: &C,
    budget_id: BudgetId,
    details: Vec<NewDetail>,
) -> Result<(), DbErr> {
    let now = Utc::now();

    for detail in details {
        // Keep insertion order stable when rows share a timestamp
        let id = Uuid::now_v7();
        let row = match detail {
            NewDetail::Limit { category_id, limit } => budget_details::ActiveModel {
                id: Set(id),
                budget_id: Set(budget_id.into_inner()),
                category_id: Set(category_id.into_inner()),
                kind: Set(DetailKind::Limit.as_str().to_string()),
                value: Set(limit),
                name: Set(None),
                expiration_date: Set(None),
                expended: Set(false),
                created_at: Set(now.into()),
            },
            NewDetail::FutureExpense {
                category_id,
                name,
                value,
                expiration_date,
            } => budget_details::ActiveModel {
                id: Set(id),
                budget_id: Set(budget_id.into_inner()),
                category_id: Set(category_id.into_inner()),
                kind: Set(DetailKind::FutureExpense.as_str().to_string()),
                value: Set(value),
                name: Set(Some(name)),
                expiration_date: Set(Some(expiration_date)),
                expended: Set(false),
                created_at: Set(now.into()),
            },
        };
        row.insert(conn).await?;
    }

    Ok(())
}

/// Messages Postgres attaches to a write that lost a race: the overlap
/// exclusion constraint, or a serializable transaction that was aborted.
const WRITE_CONFLICT_MARKERS: [&str; 3] = [
    "excl_budgets_user_overlap",
    "could not serialize access",
    "deadlock detected",
];

/// Returns true when `err` reports a concurrent write rather than a fault.
pub(crate) fn is_write_conflict(err: &DbErr) -> bool {
    let message = err.to_string();
    WRITE_CONFLICT_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

fn category_ids(categories: &[Category]) -> HashSet<CategoryId> {
    categories.iter().map(|c| c.id).collect()
}

/// Budget repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Creates a budget together with its detail batch.
    ///
    /// `skip_validation` turns off the batch-consistency rules; range,
    /// overlap, category and per-detail checks always run.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange`, `OverlappingBudget`, any detail validation
    /// error, or a database error. Nothing is persisted on error.
    pub async fn create(
        &self,
        user: UserId,
        input: BudgetInput,
        skip_validation: bool,
    ) -> Result<BudgetId, BudgetError> {
        let period = BudgetPeriod::new(input.initial_date, input.final_date)?;

        match self.create_in_window(user, period, &input, skip_validation).await {
            Err(err) => Err(self.resolve_conflict(user, Some(period), None, err).await),
            created => created,
        }
    }

    async fn create_in_window(
        &self,
        user: UserId,
        period: BudgetPeriod,
        input: &BudgetInput,
        skip_validation: bool,
    ) -> Result<BudgetId, BudgetError> {
        let txn = begin_serializable(&self.db).await?;

        let existing = load_budgets(&txn, user).await?;
        BudgetService::ensure_no_overlap(&period, &existing, None)?;

        let categories = category_ids(&load_effective(&txn, user).await?);
        let accepted = DetailValidator::new(period, &categories)
            .skip_batch_rules(skip_validation)
            .validate(&input.details)?;

        let budget_id = BudgetId::new();
        budgets::ActiveModel {
            id: Set(budget_id.into_inner()),
            user_id: Set(user.into_inner()),
            initial_date: Set(period.initial_date()),
            final_date: Set(period.final_date()),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        let detail_count = accepted.len();
        insert_details(&txn, budget_id, accepted).await?;
        txn.commit().await?;

        tracing::info!(
            user_id = %user,
            budget_id = %budget_id,
            details = detail_count,
            "Budget created"
        );
        Ok(budget_id)
    }

    /// Changes a budget's dates and replaces its limits.
    ///
    /// Stored future expenses are kept and counted against the new limits;
    /// future expenses in the batch are appended.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden`, `ImmutableBudget` once the budget has
    /// begun, plus the errors of `create`. Nothing changes on error.
    pub async fn update(
        &self,
        user: UserId,
        budget_id: BudgetId,
        input: BudgetInput,
        skip_validation: bool,
        today: NaiveDate,
    ) -> Result<(), BudgetError> {
        match self
            .replace_details(user, budget_id, &input, skip_validation, today)
            .await
        {
            Err(err) => {
                let requested = BudgetPeriod::new(input.initial_date, input.final_date).ok();
                Err(self
                    .resolve_conflict(user, requested, Some(budget_id), err)
                    .await)
            }
            updated => updated,
        }
    }

    async fn replace_details(
        &self,
        user: UserId,
        budget_id: BudgetId,
        input: &BudgetInput,
        skip_validation: bool,
        today: NaiveDate,
    ) -> Result<(), BudgetError> {
        let txn = begin_serializable(&self.db).await?;

        let model = budgets::Entity::find_by_id(budget_id.into_inner())
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound(budget_id))?;
        let budget = model.clone().into_budget()?;
        BudgetService::ensure_owner(&budget, user)?;
        BudgetService::ensure_editable(&budget, today)?;

        let period = BudgetPeriod::new(input.initial_date, input.final_date)?;
        let existing = load_budgets(&txn, user).await?;
        BudgetService::ensure_no_overlap(&period, &existing, Some(budget_id))?;

        let preserved: Vec<FutureExpenseDetail> = load_details(&txn, budget_id)
            .await?
            .into_iter()
            .filter_map(|d| match d {
                Detail::FutureExpense(fe) => Some(fe),
                Detail::Limit(_) => None,
            })
            .collect();

        let categories = category_ids(&load_effective(&txn, user).await?);
        let accepted = DetailValidator::new(period, &categories)
            .with_preserved(&preserved)
            .skip_batch_rules(skip_validation)
            .validate(&input.details)?;

        budget_details::Entity::delete_many()
            .filter(budget_details::Column::BudgetId.eq(budget_id.into_inner()))
            .filter(budget_details::Column::Kind.eq(DetailKind::Limit.as_str()))
            .exec(&txn)
            .await?;
        insert_details(&txn, budget_id, accepted).await?;

        let mut active: budgets::ActiveModel = model.into();
        active.initial_date = Set(period.initial_date());
        active.final_date = Set(period.final_date());
        active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(user_id = %user, budget_id = %budget_id, "Budget updated");
        Ok(())
    }

    /// Deletes a budget and all its details.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Forbidden`, or `ImmutableBudget` while the budget
    /// is active.
    pub async fn delete(
        &self,
        user: UserId,
        budget_id: BudgetId,
        today: NaiveDate,
    ) -> Result<(), BudgetError> {
        let txn = self.db.begin().await?;

        let budget = budgets::Entity::find_by_id(budget_id.into_inner())
            .one(&txn)
            .await?
            .map(budgets::Model::into_budget)
            .transpose()?
            .ok_or(DomainError::NotFound(budget_id))?;
        BudgetService::ensure_owner(&budget, user)?;
        BudgetService::ensure_deletable(&budget, today)?;

        budget_details::Entity::delete_many()
            .filter(budget_details::Column::BudgetId.eq(budget_id.into_inner()))
            .exec(&txn)
            .await?;
        budgets::Entity::delete_by_id(budget_id.into_inner())
            .exec(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(user_id = %user, budget_id = %budget_id, "Budget deleted");
        Ok(())
    }

    /// Settles a future expense of the current budget into the ledger.
    ///
    /// `date` defaults to `today`.
    ///
    /// # Errors
    ///
    /// Returns `NoCurrentBudget`, `DetailNotFound` when the id is not a
    /// future expense of the current budget, `AlreadySettled`, or
    /// `FutureDate` for a settlement dated after today.
    pub async fn settle_future_expense(
        &self,
        user: UserId,
        detail_id: DetailId,
        date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Expense, BudgetError> {
        match self.settle_in_current(user, detail_id, date, today).await {
            Err(err) => Err(self.resolve_conflict(user, None, None, err).await),
            settled => settled,
        }
    }

    async fn settle_in_current(
        &self,
        user: UserId,
        detail_id: DetailId,
        date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Expense, BudgetError> {
        let txn = begin_serializable(&self.db).await?;

        let budgets = load_budgets(&txn, user).await?;
        let current =
            BudgetService::current_of(&budgets, today).ok_or(DomainError::NoCurrentBudget)?;
        let details = load_details(&txn, current.id).await?;
        let detail = BudgetService::find_settleable(&details, detail_id)?;
        let input = BudgetService::settlement_expense(detail, date.unwrap_or(today), today)?;

        let expense = insert_expense(&txn, user, input, true).await?;

        let settled = budget_details::ActiveModel {
            id: Set(detail_id.into_inner()),
            expended: Set(true),
            ..Default::default()
        };
        settled.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            user_id = %user,
            detail_id = %detail_id,
            expense_id = %expense.id,
            "Future expense settled"
        );
        Ok(expense.into())
    }

    /// Turns a lost write race into a rule violation.
    ///
    /// The transaction has rolled back by now, so the overlap check is
    /// repeated against committed rows to name the budget that won.
    async fn resolve_conflict(
        &self,
        user: UserId,
        requested: Option<BudgetPeriod>,
        own: Option<BudgetId>,
        err: BudgetError,
    ) -> BudgetError {
        let BudgetError::Database(db_err) = &err else {
            return err;
        };
        if !is_write_conflict(db_err) {
            return err;
        }
        tracing::warn!(user_id = %user, error = %db_err, "Concurrent budget write rejected");

        let Some(period) = requested else {
            return DomainError::ConcurrentModification.into();
        };
        match load_budgets(&self.db, user).await {
            Ok(existing) => match BudgetService::ensure_no_overlap(&period, &existing, own) {
                Err(overlap) => overlap.into(),
                Ok(()) => DomainError::ConcurrentModification.into(),
            },
            Err(reload) => reload.into(),
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Lists a user's budgets in creation order, expanded with aggregates.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_all(
        &self,
        user: UserId,
        today: NaiveDate,
    ) -> Result<Vec<BudgetView>, DbErr> {
        let budgets = load_budgets(&self.db, user).await?;
        let Some(from) = budgets.iter().map(|b| b.period.initial_date()).min() else {
            return Ok(Vec::new());
        };
        let to = budgets
            .iter()
            .map(|b| b.period.final_date())
            .max()
            .unwrap_or(from);

        let categories = load_effective(&self.db, user).await?;
        let expenses = expenses_between(&self.db, user, from, to).await?;

        let mut views = Vec::with_capacity(budgets.len());
        for budget in &budgets {
            let details = load_details(&self.db, budget.id).await?;
            views.push(BudgetService::build_view(
                budget,
                &details,
                &expenses,
                &categories,
                today,
            ));
        }
        Ok(views)
    }

    /// Returns the budget covering today, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_current(
        &self,
        user: UserId,
        today: NaiveDate,
    ) -> Result<Option<BudgetView>, DbErr> {
        let budgets = load_budgets(&self.db, user).await?;
        match BudgetService::current_of(&budgets, today) {
            Some(current) => self.expand(user, current, today).await.map(Some),
            None => Ok(None),
        }
    }

    /// Gets one budget, expanded with aggregates.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Forbidden`, or a database error.
    pub async fn get_budget(
        &self,
        user: UserId,
        budget_id: BudgetId,
        today: NaiveDate,
    ) -> Result<BudgetView, BudgetError> {
        let budget = budgets::Entity::find_by_id(budget_id.into_inner())
            .one(&self.db)
            .await?
            .map(budgets::Model::into_budget)
            .transpose()?
            .ok_or(DomainError::NotFound(budget_id))?;
        BudgetService::ensure_owner(&budget, user)?;
        Ok(self.expand(user, &budget, today).await?)
    }

    /// Collects, per user, the future expenses of their current budget that
    /// are due for a reminder `lead_days` from `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn due_reminders(
        &self,
        today: NaiveDate,
        lead_days: i64,
    ) -> Result<Vec<ReminderGroup>, DbErr> {
        let current = budgets::Entity::find()
            .filter(budgets::Column::InitialDate.lte(today))
            .filter(budgets::Column::FinalDate.gte(today))
            .order_by_asc(budgets::Column::UserId)
            .all(&self.db)
            .await?;

        let mut groups = Vec::new();
        let mut emails: HashMap<Uuid, Option<String>> = HashMap::new();

        for model in current {
            let budget = model.into_budget()?;
            let details = load_details(&self.db, budget.id).await?;
            let due = due_details(&details, today, lead_days);
            if due.is_empty() {
                continue;
            }

            let user_key = budget.user_id.into_inner();
            if !emails.contains_key(&user_key) {
                let email = users::Entity::find_by_id(user_key)
                    .one(&self.db)
                    .await?
                    .and_then(|u| u.email);
                emails.insert(user_key, email);
            }

            groups.push(ReminderGroup {
                user_id: budget.user_id,
                email: emails.get(&user_key).cloned().flatten(),
                details: due,
            });
        }

        tracing::debug!(groups = groups.len(), %today, lead_days, "Reminder scan finished");
        Ok(groups)
    }

    async fn expand(
        &self,
        user: UserId,
        budget: &Budget,
        today: NaiveDate,
    ) -> Result<BudgetView, DbErr> {
        let details = load_details(&self.db, budget.id).await?;
        let categories = load_effective(&self.db, user).await?;
        let expenses = expenses_between(
            &self.db,
            user,
            budget.period.initial_date(),
            budget.period.final_date(),
        )
        .await?;
        Ok(BudgetService::build_view(
            budget,
            &details,
            &expenses,
            &categories,
            today,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::{ConnectOptions, Database, RuntimeErr};
    use sea_orm_migration::MigratorTrait;
    use walletify_core::budget::DetailInput;

    use crate::migration::Migrator;
    use crate::repositories::{CategoryRepository, DEFAULT_STATIC_CATEGORIES, UserRepository};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn exclusion_violation() -> DbErr {
        DbErr::Exec(RuntimeErr::Internal(
            "error returned from database: conflicting key value violates exclusion \
             constraint \"excl_budgets_user_overlap\""
                .to_string(),
        ))
    }

    #[test]
    fn test_write_conflicts_are_recognised() {
        assert!(is_write_conflict(&exclusion_violation()));
        assert!(is_write_conflict(&DbErr::Exec(RuntimeErr::Internal(
            "could not serialize access due to read/write dependencies among transactions"
                .to_string()
        ))));
        assert!(!is_write_conflict(&DbErr::Custom("connection reset".to_string())));
    }

    #[tokio::test]
    async fn test_lost_race_reports_the_winning_budget() {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        CategoryRepository::new(db.clone())
            .seed_static(&DEFAULT_STATIC_CATEGORIES)
            .await
            .unwrap();
        let user = UserId::new();
        UserRepository::new(db.clone())
            .ensure_exists(user, None)
            .await
            .unwrap();
        let category = load_effective(&db, user).await.unwrap()[0].id;

        let repo = BudgetRepository::new(db);
        let winner = repo
            .create(
                user,
                BudgetInput {
                    initial_date: date("2030-01-01"),
                    final_date: date("2030-01-31"),
                    details: vec![DetailInput::limit(category, dec!(10))],
                },
                false,
            )
            .await
            .unwrap();

        let overlapping = BudgetPeriod::new(date("2030-01-15"), date("2030-02-15")).unwrap();
        let err = repo
            .resolve_conflict(
                user,
                Some(overlapping),
                None,
                BudgetError::Database(exclusion_violation()),
            )
            .await;
        assert!(matches!(
            err,
            BudgetError::Domain(DomainError::OverlappingBudget { conflicting }) if conflicting == winner
        ));

        let disjoint = BudgetPeriod::new(date("2030-03-01"), date("2030-03-31")).unwrap();
        let err = repo
            .resolve_conflict(user, Some(disjoint), None, BudgetError::Database(exclusion_violation()))
            .await;
        assert!(matches!(
            err,
            BudgetError::Domain(DomainError::ConcurrentModification)
        ));

        let err = repo
            .resolve_conflict(
                user,
                Some(disjoint),
                None,
                BudgetError::Database(DbErr::Custom("disk full".to_string())),
            )
            .await;
        assert!(matches!(err, BudgetError::Database(_)));
    }
}
