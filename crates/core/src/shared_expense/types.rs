//! Shared expense data types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use walletify_shared::types::{CategoryId, SharedExpenseId, UserId};

use crate::expense::ExpenseInput;

/// An expense recorded by one user for another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedExpense {
    /// Shared expense ID.
    pub id: SharedExpenseId,
    /// User who recorded it.
    pub owner_id: UserId,
    /// User it was shared with.
    pub recipient_id: UserId,
    /// Category charged.
    pub category_id: CategoryId,
    /// Short description.
    pub name: String,
    /// Amount spent.
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    /// Day the money was spent.
    pub date: NaiveDate,
    /// Set once the recipient accepts it.
    pub accepted: bool,
    /// Creation timestamp.
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

/// Input for recording a shared expense.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SharedExpenseInput {
    /// Category charged.
    pub category_id: CategoryId,
    /// Short description.
    pub name: String,
    /// Amount spent.
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    /// Day the money was spent.
    pub date: NaiveDate,
    /// Recipient's email.
    pub share_with: String,
}

/// Fields the recipient may change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SharedExpenseEdit {
    /// Category charged.
    pub category_id: CategoryId,
    /// Short description.
    pub name: String,
    /// Amount spent.
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    /// Day the money was spent.
    pub date: NaiveDate,
}

impl From<&SharedExpenseInput> for ExpenseInput {
    fn from(input: &SharedExpenseInput) -> Self {
        Self {
            category_id: input.category_id,
            name: input.name.clone(),
            value: input.value,
            date: input.date,
        }
    }
}

impl From<&SharedExpenseEdit> for ExpenseInput {
    fn from(edit: &SharedExpenseEdit) -> Self {
        Self {
            category_id: edit.category_id,
            name: edit.name.clone(),
            value: edit.value,
            date: edit.date,
        }
    }
}

/// Which side of the share a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharedScope {
    /// Recorded by the caller.
    Mine,
    /// Recorded by someone else for the caller.
    SharedWithMe,
}

/// Date range and optional category over one side of the caller's shares.
#[derive(Debug, Clone, Deserialize)]
pub struct SharedExpenseFilter {
    /// Side of the share.
    pub scope: SharedScope,
    /// First day, inclusive.
    pub from: NaiveDate,
    /// Last day, inclusive.
    pub to: NaiveDate,
    /// Category to keep; none keeps all.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}
