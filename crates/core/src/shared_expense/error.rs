//! Shared expense error types.

use thiserror::Error;
use walletify_shared::types::{CategoryId, SharedExpenseId};

use crate::expense::ExpenseError;

/// Shared-expense errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SharedExpenseError {
    /// Date, value or name breaks a ledger write rule.
    #[error(transparent)]
    Invalid(ExpenseError),

    /// No user is known under the given email.
    #[error("No user found for '{0}'")]
    UserNotFound(String),

    /// Owner and recipient are the same user.
    #[error("An expense cannot be shared with yourself")]
    CannotShareWithSelf,

    /// Category is not visible to both users.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Shared expense not found.
    #[error("Shared expense not found: {0}")]
    NotFound(SharedExpenseId),

    /// Caller may not see or change this shared expense.
    #[error("Shared expense belongs to other users")]
    Forbidden,

    /// Recipient already accepted it.
    #[error("Shared expense {0} has already been accepted")]
    AlreadyAccepted(SharedExpenseId),
}

impl SharedExpenseError {
    /// Returns the machine-readable error code for API responses.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Invalid(inner) => inner.code(),
            Self::UserNotFound(_) => "user_not_found",
            Self::CannotShareWithSelf => "cannot_share_with_self",
            Self::CategoryNotFound(_) => "category_not_found",
            Self::NotFound(_) => "shared_expense_not_found",
            Self::Forbidden => "forbidden",
            Self::AlreadyAccepted(_) => "already_accepted",
        }
    }
}

impl From<ExpenseError> for SharedExpenseError {
    fn from(err: ExpenseError) -> Self {
        match err {
            ExpenseError::CategoryNotFound(id) => Self::CategoryNotFound(id),
            ExpenseError::Forbidden => Self::Forbidden,
            other => Self::Invalid(other),
        }
    }
}
