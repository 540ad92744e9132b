//! Expense data types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use walletify_shared::types::{CategoryId, ExpenseId, UserId};

/// A recorded expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// Owning user.
    #[serde(skip_serializing)]
    pub user_id: UserId,
    /// Category charged.
    pub category_id: CategoryId,
    /// Short description.
    pub name: String,
    /// Amount spent.
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    /// Day the money was spent.
    pub date: NaiveDate,
    /// True when the expense was created by settling a future expense.
    pub future_expense: bool,
    /// Creation timestamp.
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

/// Input for creating or updating an expense.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExpenseInput {
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

/// Date range and category filter over a user's expenses.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseFilter {
    /// First day, inclusive.
    pub from: NaiveDate,
    /// Last day, inclusive.
    pub to: NaiveDate,
    /// Categories to keep; empty keeps all.
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
}

impl ExpenseFilter {
    /// Returns true if `expense` passes the filter.
    #[must_use]
    pub fn matches(&self, expense: &Expense) -> bool {
        expense.date >= self.from
            && expense.date <= self.to
            && (self.category_ids.is_empty() || self.category_ids.contains(&expense.category_id))
    }
}
