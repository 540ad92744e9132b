//! Expense error types.

use thiserror::Error;
use walletify_shared::types::{CategoryId, ExpenseId};

/// Expense-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseError {
    /// Expense date lies after today.
    #[error("Expense date cannot be in the future")]
    FutureDate,

    /// Value is zero or negative.
    #[error("Expense value must be greater than zero")]
    NonPositiveValue,

    /// Value has more than two fractional digits.
    #[error("Expense value must have at most 2 decimal places")]
    InvalidPrecision,

    /// Value exceeds the storable maximum.
    #[error("Expense value exceeds the maximum allowed amount")]
    AmountTooLarge,

    /// Name is empty or too long.
    #[error("Expense name must be between 1 and {max} characters")]
    InvalidName {
        /// Maximum name length.
        max: usize,
    },

    /// Category is not in the caller's effective set.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Expense not found.
    #[error("Expense not found: {0}")]
    NotFound(ExpenseId),

    /// Expense belongs to another user.
    #[error("Expense belongs to another user")]
    Forbidden,

    /// Filter range is inverted.
    #[error("Filter start date must not be after its end date")]
    InvalidRange,
}

impl ExpenseError {
    /// Returns the machine-readable error code for API responses.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::FutureDate => "future_date",
            Self::NonPositiveValue => "non_positive_value",
            Self::InvalidPrecision => "invalid_precision",
            Self::AmountTooLarge => "amount_too_large",
            Self::InvalidName { .. } => "invalid_name",
            Self::CategoryNotFound(_) => "category_not_found",
            Self::NotFound(_) => "expense_not_found",
            Self::Forbidden => "forbidden",
            Self::InvalidRange => "invalid_range",
        }
    }
}
