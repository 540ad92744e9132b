//! Budget error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use walletify_shared::types::{AmountError, BudgetId, CategoryId, DetailId};

/// Budget-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// Initial date is after final date.
    #[error("Initial date {initial_date} is after final date {final_date}")]
    InvalidRange {
        /// Requested first day.
        initial_date: NaiveDate,
        /// Requested last day.
        final_date: NaiveDate,
    },

    /// Date range collides with another budget of the same user.
    #[error("Budget dates overlap with budget {conflicting}")]
    OverlappingBudget {
        /// The budget already occupying part of the range.
        conflicting: BudgetId,
    },

    /// Detail batch is empty.
    #[error("A budget needs at least one detail")]
    EmptyBudget,

    /// Detail carries both or neither of `limit` and `value`.
    #[error("Detail for category {0} must have exactly one of 'limit' or 'value'")]
    AmbiguousDetail(CategoryId),

    /// Future expense lacks a required field.
    #[error("Future expense is missing '{field}'")]
    MissingFutureExpenseField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// Detail batch has no limit.
    #[error("A budget needs at least one limit detail")]
    NoLimitDetail,

    /// Two limits for the same category.
    #[error("Category {0} has more than one limit")]
    DuplicateCategoryLimit(CategoryId),

    /// Future expense in a category without a limit.
    #[error("Category {0} has future expenses but no limit")]
    NoLimitForFutureExpense(CategoryId),

    /// Future expenses of a category add up to more than its limit.
    #[error("Future expenses of category {category_id} total {total}, above its limit of {limit}")]
    FutureExpenseExceedsLimit {
        /// Category concerned.
        category_id: CategoryId,
        /// Sum of the category's future expenses.
        total: Decimal,
        /// The category's limit.
        limit: Decimal,
    },

    /// Amount below zero.
    #[error("Detail amounts must be greater than zero")]
    NonPositiveAmount,

    /// Amount with more than two fractional digits.
    #[error("Detail amounts must have at most 2 decimal places")]
    InvalidPrecision,

    /// Amount above the storable maximum.
    #[error("Detail amount exceeds the maximum allowed amount")]
    AmountTooLarge,

    /// Future expense expires outside the budget window.
    #[error("Future expense expiring on {expiration_date} lies outside the budget dates")]
    DetailOutOfBudgetRange {
        /// The offending expiration date.
        expiration_date: NaiveDate,
    },

    /// Detail references a category outside the user's effective set.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Budget not found.
    #[error("Budget not found: {0}")]
    NotFound(BudgetId),

    /// Budget belongs to another user.
    #[error("Budget belongs to another user")]
    Forbidden,

    /// Budget has begun and can no longer be changed.
    #[error("Budget is active or has already begun and cannot be modified")]
    ImmutableBudget,

    /// No budget covers today.
    #[error("There is no current budget")]
    NoCurrentBudget,

    /// Future expense not found in the current budget.
    #[error("Future expense not found in the current budget: {0}")]
    DetailNotFound(DetailId),

    /// Future expense was already turned into an expense.
    #[error("Future expense {0} has already been settled")]
    AlreadySettled(DetailId),

    /// Settlement dated after today.
    #[error("Settlement date cannot be in the future")]
    FutureDate,

    /// A concurrent write to the same budgets won; the request can be retried.
    #[error("Budgets were changed by another request, please retry")]
    ConcurrentModification,
}

impl BudgetError {
    /// Returns the machine-readable error code for API responses.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRange { .. } => "invalid_range",
            Self::OverlappingBudget { .. } => "overlapping_budget",
            Self::EmptyBudget => "empty_budget",
            Self::AmbiguousDetail(_) => "ambiguous_detail",
            Self::MissingFutureExpenseField { .. } => "missing_future_expense_field",
            Self::NoLimitDetail => "no_limit_detail",
            Self::DuplicateCategoryLimit(_) => "duplicate_category_limit",
            Self::NoLimitForFutureExpense(_) => "no_limit_for_future_expense",
            Self::FutureExpenseExceedsLimit { .. } => "future_expense_exceeds_limit",
            Self::NonPositiveAmount => "non_positive_amount",
            Self::InvalidPrecision => "invalid_precision",
            Self::AmountTooLarge => "amount_too_large",
            Self::DetailOutOfBudgetRange { .. } => "detail_out_of_budget_range",
            Self::CategoryNotFound(_) => "category_not_found",
            Self::NotFound(_) => "budget_not_found",
            Self::Forbidden => "forbidden",
            Self::ImmutableBudget => "immutable_budget",
            Self::NoCurrentBudget => "no_current_budget",
            Self::DetailNotFound(_) => "detail_not_found",
            Self::AlreadySettled(_) => "already_settled",
            Self::FutureDate => "future_date",
            Self::ConcurrentModification => "concurrent_modification",
        }
    }

    /// Returns true for errors that mean "no such resource" to the caller.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::DetailNotFound(_))
    }
}

impl From<AmountError> for BudgetError {
    fn from(err: AmountError) -> Self {
        match err {
            AmountError::NonPositive => Self::NonPositiveAmount,
            AmountError::TooPrecise => Self::InvalidPrecision,
            AmountError::TooLarge => Self::AmountTooLarge,
        }
    }
}
