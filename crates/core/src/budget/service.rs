//! Budget business logic.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use walletify_shared::types::{BudgetId, CategoryId, DetailId, UserId};

use crate::category::Category;
use crate::expense::{Expense, ExpenseInput, spent_by_category};

use super::error::BudgetError;
use super::period::BudgetPeriod;
use super::types::{Budget, BudgetView, Detail, DetailView, FutureExpenseDetail};

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Checks `period` against a user's other budgets.
    ///
    /// `exclude` skips the budget being updated.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::OverlappingBudget` naming the first collision.
    pub fn ensure_no_overlap(
        period: &BudgetPeriod,
        existing: &[Budget],
        exclude: Option<BudgetId>,
    ) -> Result<(), BudgetError> {
        match existing
            .iter()
            .filter(|b| Some(b.id) != exclude)
            .find(|b| b.period.overlaps(period))
        {
            Some(conflict) => Err(BudgetError::OverlappingBudget {
                conflicting: conflict.id,
            }),
            None => Ok(()),
        }
    }

    /// Checks that `user` owns `budget`.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::Forbidden` otherwise.
    pub fn ensure_owner(budget: &Budget, user: UserId) -> Result<(), BudgetError> {
        if budget.user_id == user {
            Ok(())
        } else {
            Err(BudgetError::Forbidden)
        }
    }

    /// Checks that the budget's dates and details may still change.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::ImmutableBudget` once the budget has begun.
    pub fn ensure_editable(budget: &Budget, today: NaiveDate) -> Result<(), BudgetError> {
        if budget.is_editable(today) {
            Ok(())
        } else {
            Err(BudgetError::ImmutableBudget)
        }
    }

    /// Checks that the budget may be deleted.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::ImmutableBudget` while the budget is active.
    pub fn ensure_deletable(budget: &Budget, today: NaiveDate) -> Result<(), BudgetError> {
        if budget.is_active(today) {
            Err(BudgetError::ImmutableBudget)
        } else {
            Ok(())
        }
    }

    /// Returns the budget covering `today`, if any.
    #[must_use]
    pub fn current_of(budgets: &[Budget], today: NaiveDate) -> Option<&Budget> {
        budgets.iter().find(|b| b.is_active(today))
    }

    /// Finds an unsettled future expense among a budget's details.
    ///
    /// # Errors
    ///
    /// Returns `DetailNotFound` if `detail_id` is not a future expense of the
    /// set, and `AlreadySettled` if it was settled before.
    pub fn find_settleable(
        details: &[Detail],
        detail_id: DetailId,
    ) -> Result<&FutureExpenseDetail, BudgetError> {
        let detail = details
            .iter()
            .find_map(|d| match d {
                Detail::FutureExpense(fe) if fe.id == detail_id => Some(fe),
                _ => None,
            })
            .ok_or(BudgetError::DetailNotFound(detail_id))?;

        if detail.expended {
            return Err(BudgetError::AlreadySettled(detail_id));
        }
        Ok(detail)
    }

    /// Builds the ledger entry for a settlement.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::FutureDate` if `date` is after `today`.
    pub fn settlement_expense(
        detail: &FutureExpenseDetail,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<ExpenseInput, BudgetError> {
        if date > today {
            return Err(BudgetError::FutureDate);
        }
        Ok(ExpenseInput {
            category_id: detail.category_id,
            name: detail.name.clone(),
            value: detail.value,
            date,
        })
    }

    /// Expands a budget into its read model.
    ///
    /// `expenses` may hold any of the owner's expenses; only those inside the
    /// window count. Every category of `categories` without a limit gets a
    /// zero placeholder after the stored details.
    #[must_use]
    pub fn build_view(
        budget: &Budget,
        details: &[Detail],
        expenses: &[Expense],
        categories: &[Category],
        today: NaiveDate,
    ) -> BudgetView {
        let period = budget.period;
        let spent = spent_by_category(expenses, period.initial_date(), period.final_date());
        let spent_for =
            |category_id: CategoryId| spent.get(&category_id).copied().unwrap_or_default();

        let mut views = Vec::with_capacity(details.len() + categories.len());
        let mut total_limit = Decimal::ZERO;
        let mut total_spent = Decimal::ZERO;

        for detail in details {
            if let Detail::Limit(limit) = detail {
                let category_spent = spent_for(limit.category_id);
                total_limit += limit.limit;
                total_spent += category_spent;
                views.push(DetailView::Limit {
                    id: Some(limit.id),
                    category_id: limit.category_id,
                    limit: limit.limit,
                    spent: category_spent,
                    remaining: limit.limit - category_spent,
                });
            }
        }

        for detail in details {
            if let Detail::FutureExpense(fe) = detail {
                views.push(DetailView::FutureExpense {
                    id: fe.id,
                    category_id: fe.category_id,
                    name: fe.name.clone(),
                    value: fe.value,
                    expiration_date: fe.expiration_date,
                    expended: fe.expended,
                    spent: spent_for(fe.category_id),
                });
            }
        }

        for category in categories {
            let limited = details
                .iter()
                .any(|d| matches!(d, Detail::Limit(l) if l.category_id == category.id));
            if !limited {
                views.push(DetailView::Limit {
                    id: None,
                    category_id: category.id,
                    limit: Decimal::ZERO,
                    spent: Decimal::ZERO,
                    remaining: Decimal::ZERO,
                });
            }
        }

        BudgetView {
            id: budget.id,
            initial_date: period.initial_date(),
            final_date: period.final_date(),
            details: views,
            total_limit,
            total_spent,
            active: budget.is_active(today),
            editable: budget.is_editable(today),
        }
    }
}
